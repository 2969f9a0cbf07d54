pub mod element;
pub mod loaders;
pub mod media;
pub mod option;
pub mod page;
pub mod settings;
pub mod validators;
pub mod value;

pub use element::{
    ChoiceInput, DateInput, Element, ElementKind, FileUploadInput, GridInput, GridRow, Prefill,
    ScaleInput, TextInput, TimeInput,
};
pub use loaders::{load_answer_sheet, AnswerSheet, RawAnswer};
pub use media::{Alignment, ImageObject};
pub use option::ChoiceOption;
pub use page::{Page, PageTarget};
pub use settings::{CollectEmails, SendReceipt, Settings};
pub use validators::{CheckboxValidator, GridValidator, TextRule, TextValidator};
pub use value::Value;
