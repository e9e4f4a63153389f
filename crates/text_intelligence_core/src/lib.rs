pub mod clock;
pub mod domain;
pub mod nonce;
pub mod ports;
pub mod session;
pub mod validation;

pub use clock::{Clock, MockClock, SystemClock};
pub use domain::{
    AnalysisInput, AnalysisOptions, AnalysisParams, AnalysisRequest, AnalysisResults, Summarize,
};
pub use nonce::{NonceId, NonceStore};
pub use ports::{AnalysisError, AnalysisResult, TextAnalysisService};
pub use session::{AuthError, SessionClaims, SessionIssuer, SessionSecret, SessionToken};
pub use validation::{build_options, validate, ValidationError};
