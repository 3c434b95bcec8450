//! # Pumpkin graph
//! Propagators for graph variables: variables whose value is a graph, with a domain given by a
//! lower bound graph of mandatory nodes and edges and an upper bound graph of potential nodes and
//! edges.
//!
//! The crate provides
//! - the domain abstractions the propagators operate on ([`engine::GraphDomain`],
//!   [`engine::DeltaSource`], [`engine::BoundedInteger`], [`engine::EnumeratedInteger`]), together
//!   with checkpointed implementations of them ([`engine::GraphVariable`],
//!   [`engine::IntegerDomain`], [`engine::EnumeratedDomain`]);
//! - the propagator interface ([`propagation::GraphPropagator`]);
//! - propagators for transitivity, bounded node degrees, connectedness and the channel between a
//!   graph and successor variables, and a Held-Karp Lagrangian relaxation for tours
//!   ([`propagators::tsp`]).
//!
//! A propagation either succeeds or returns an [`basic_types::Inconsistency`]; restoring the
//! domains afterwards is the responsibility of the host.
//!
//! ```
//! use pumpkin_graph::engine::GraphDomain;
//! use pumpkin_graph::engine::GraphVariable;
//! use pumpkin_graph::propagation::GraphPropagator;
//! use pumpkin_graph::propagation::PropagatorConstructor;
//! use pumpkin_graph::propagators::TransitivityArgs;
//!
//! let mut graph = GraphVariable::unconstrained(3, true);
//! let mut propagator = TransitivityArgs.create(&graph).unwrap();
//!
//! let _ = graph.enforce_edge(0, 1).unwrap();
//! let _ = graph.enforce_edge(1, 2).unwrap();
//! propagator.propagate_from_scratch(&mut graph).unwrap();
//!
//! assert!(graph.is_mandatory_edge(0, 2));
//! ```
pub mod basic_types;
pub mod containers;
pub mod engine;
pub mod propagation;
pub mod propagators;
#[doc(hidden)]
pub mod pumpkin_asserts;
pub mod statistics;
