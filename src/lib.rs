// Library surface for headless/integration tests and reuse.
pub mod app;
pub mod report;
pub mod roster;
pub mod runtime;
pub mod score;
pub mod stimulus;
pub mod trial;
pub mod ui;
pub mod util;
