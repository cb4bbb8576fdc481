pub mod toml_loader;

pub use toml_loader::{load_all_fixtures, load_form_fixture, parse_form_fixture, FormFixture};
