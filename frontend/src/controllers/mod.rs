pub mod form;
pub mod notifier;
pub mod status;
