//! Behavioural suites for the workspace edit engine.

mod support;
mod workspace_edit_behaviour;
