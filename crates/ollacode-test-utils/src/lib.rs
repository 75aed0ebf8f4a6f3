//! Testing utilities and fixtures for ollacode.
//!
//! - **Fixtures**: temporary project directories
//! - **Providers**: a scripted [`LanguageModel`](ollacode_provider::LanguageModel)
//!   that records what it was sent
//! - **Confirm**: a scripted operator for the confirmation gate
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use ollacode_test_utils::{fixtures::TestProject, providers::ScriptedModel};
//!
//! #[tokio::test]
//! async fn test_agent_reads_file() {
//!     let project = TestProject::new()
//!         .with_file("src/index.js", "console.log(1);")
//!         .build();
//!
//!     let model = ScriptedModel::new()
//!         .with_response("```json\n{\"tool\": \"done\", \"args\": {\"message\": \"ok\"}}\n```");
//!
//!     assert!(project.path().join("src/index.js").exists());
//! }
//! ```

pub mod confirm;
pub mod fixtures;
pub mod providers;

pub use confirm::ScriptedConfirmer;
pub use fixtures::{BuiltTestProject, TestProject};
pub use providers::ScriptedModel;
