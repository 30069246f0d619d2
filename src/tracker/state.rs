pub const INVALID_ADDRESS: &str = "You must enter a valid IP Address";
pub const LOOKUP_FAILED: &str = "Something went wrong while locating this IP Address";

#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub ip: String,
    pub isp: String,
    pub region: String,
    pub timezone: String,
    pub lat: f64,
    pub lng: f64,
}

impl LookupResult {
    pub fn center(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

impl Default for LookupResult {
    fn default() -> Self {
        Self {
            ip: String::from("192.168.20.20"),
            isp: String::from("SpaceX"),
            region: String::from("Brooklyn, NY 10001"),
            timezone: String::from("UTC-05:00"),
            lat: 51.505,
            lng: -0.09,
        }
    }
}

/// Result of one geolocation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Located(LookupResult),
    Failed(String),
}

/// What the user currently sees. The result and the error are independent:
/// a failed lookup leaves the last good result on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    result: LookupResult,
    error_message: String,
}

impl ViewState {
    pub fn result(&self) -> &LookupResult {
        &self.result
    }

    pub fn error_message(&self) -> Option<&str> {
        if self.error_message.is_empty() {
            None
        } else {
            Some(&self.error_message)
        }
    }

    pub fn clear_error(&mut self) {
        self.error_message.clear();
    }

    pub fn reject_input(&mut self) {
        self.error_message = INVALID_ADDRESS.to_owned();
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Located(result) => {
                self.result = result;
                self.error_message.clear();
            }
            Outcome::Failed(message) => {
                self.error_message = if message.trim().is_empty() {
                    LOOKUP_FAILED.to_owned()
                } else {
                    message
                };
            }
        }
    }
}
