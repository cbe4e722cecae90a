pub mod confidence;
pub mod header;
pub mod item_actions;
pub mod toast;
pub mod top_nav;
pub mod ui;

pub use confidence::ConfidenceDot;
pub(crate) use header::Header;
pub use item_actions::ItemActions;
pub use toast::Toaster;
pub use top_nav::TopNav;
