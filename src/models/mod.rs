pub mod answer_settings;
pub mod form;
pub mod form_document;
pub mod form_state;
pub mod ids;
pub mod loaders;
pub mod page;

pub use answer_settings::AnswerSettings;
pub use form::Form;
pub use form_document::FormDocument;
pub use form_state::{FormEvent, FormState, LiveReadiness, TaskSection, TransitionGuards};
pub use ids::{FormId, PageId};
pub use loaders::{load_all_fixtures, load_form_fixture, parse_form_fixture, FormFixture};
pub use page::{NewPage, Page, PageRecord};
