//! Transform adapters over the pre-trained artifacts.
//!
//! These adapters apply the encoder vocabulary and scaler parameters to a
//! DataFrame. Both are strict: an unseen category or an unregistered column
//! aborts the whole batch — a trained model's input contract leaves no room
//! for placeholder codes or skipped columns.

mod encoder;
mod scaler;

pub use encoder::CategoryEncoder;
pub use scaler::StandardScalerAdapter;
