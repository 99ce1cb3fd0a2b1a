//! Interactive prompt used when no lookup is given on the command line.

use dialoguer::{Input, Select};
use phone_safe_location_models::Coordinate;

use crate::Request;

enum Mode {
    Postcode,
    Position,
}

impl Mode {
    const ALL: &[Self] = &[Self::Postcode, Self::Position];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Postcode => "Enter a postcode",
            Self::Position => "Use my current position",
        }
    }
}

/// Asks what to look up.
///
/// A blank postcode is passed through as-is so the lookup reports it the
/// same way it would for `--postcode ""`.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read from or the entered
/// position is out of range.
pub fn prompt() -> Result<Request, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Mode::ALL.iter().map(Mode::label).collect();

    let idx = Select::new()
        .with_prompt("How would you like to check your area?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Mode::ALL[idx] {
        Mode::Postcode => {
            let postcode: String = Input::new()
                .with_prompt("Postcode")
                .allow_empty(true)
                .interact_text()?;
            Ok(Request::postcode(postcode))
        }
        Mode::Position => {
            let lat: f64 = Input::new().with_prompt("Latitude").interact_text()?;
            let lng: f64 = Input::new().with_prompt("Longitude").interact_text()?;
            Ok(Request::position(Coordinate::new(lat, lng)?))
        }
    }
}
