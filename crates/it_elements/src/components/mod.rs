//! The eleven element definitions and the state they share.

pub mod checkable;
pub mod field;

mod alert;
mod button;
mod button_group;
mod checkbox;
mod file;
mod group;
mod input;
mod radio;
mod select;
mod textarea;
mod toggle;

pub use alert::Alert;
pub use button::Button;
pub use button_group::ButtonGroup;
pub use checkbox::Checkbox;
pub use file::FileInput;
pub use group::{aggregate, FormGroup};
pub use input::TextInput;
pub use radio::Radio;
pub use select::{host_options, Select, SelectOption};
pub use textarea::{TextArea, DEFAULT_ROWS};
pub use toggle::Toggle;
