//! Behaviour suites for the dispatch daemon.

mod bootstrap_behaviour;
mod support;
