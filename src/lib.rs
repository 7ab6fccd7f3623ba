//! Citysearch – query and browse the citizens of an exported city.
//!
//! An exported city is one large JSON document: a grid of tiles holding
//! buildings, floors and addresses (some of them companies with a job
//! roster), plus the list of citizens. Citysearch decodes such a document,
//! builds a few lookups over it once, and answers small free-form queries
//! like `silva gender:female jobTitle:Head Chef` against it.
//!
//! ## Modules
//! * [`decode`] – `.cit`/`.citb` city and `.sod`/`.sodb` save decoding.
//! * [`document`] – a lenient, typed view over the decoded JSON.
//! * [`index`] – address, resident and job lookups, owned by [`index::CityIndex`].
//! * [`schema`] – the filter keys and the values they can take.
//! * [`query`] – the query language parser.
//! * [`predicate`] – whether a citizen satisfies a parsed query.
//! * [`engine`] – capped, memoised search over a loaded city.
//! * [`suggest`] – key and value autocomplete.
//! * [`overlay`], [`keymap`], [`session`] – state of an interactive search session.
//! * [`directory`], [`profile`], [`knockout`] – building lists, citizen cards
//!   and the knockout roster.
//! * [`server`] – the HTTP surface.
//!
//! ## Query language
//! Tokens are split on whitespace. A token with a colon after at least one
//! character is a filter (`key:value`); anything else is free text matched
//! against names. Values under the same key are alternatives, different keys
//! must all hold, and every free text word must appear in the name.
//!
//! ## Quick Start
//! ```
//! use citysearch::engine::Engine;
//! use citysearch::index::CityIndex;
//! use serde_json::json;
//! let city = CityIndex::from_value(json!({
//!     "citizens": [
//!         { "humanID": 1, "citizenName": "Ana Silva", "gender": 1 },
//!         { "humanID": 2, "citizenName": "Bo Silva", "gender": 0 }
//!     ]
//! }));
//! let results = Engine::new(&city).search("silva gender:female");
//! assert_eq!(results.rows(&city)[0].human_id, Some(1));
//! ```

pub mod decode;
pub mod directory;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod keymap;
pub mod knockout;
pub mod labels;
pub mod overlay;
pub mod predicate;
pub mod profile;
pub mod query;
pub mod schema;
pub mod server;
pub mod session;
pub mod settings;
pub mod suggest;

pub use error::{CitySearchError, Result};
