pub mod alert;
pub mod button;
pub mod dialog;
pub mod input;
pub mod label;
pub mod spinner;

pub use alert::*;
pub use button::*;
pub use dialog::*;
pub use input::*;
pub use label::*;
pub use spinner::*;
