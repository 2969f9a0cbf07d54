pub mod answers_loader;

pub use answers_loader::{load_answer_sheet, AnswerSheet, RawAnswer};
