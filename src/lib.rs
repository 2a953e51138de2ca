/*
Copyright 2020 Google LLC

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    https://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! A reflective-style dependency-injection container.
//!
//! `keystone` resolves a graph of plain constructor functions by type:
//! register constructors with [`Container::provide`] (or one of its
//! sibling methods for named values, value groups, and multi-field
//! results), then pull the object graph together with
//! [`Container::resolve`] or [`Container::invoke`]. Values are built at
//! most once per [`Scope`] and cached; [`Scope::scope`] opens a nested
//! scope with its own caches that still sees every ancestor's providers.
//!
//! ```
//! use keystone::{Container, ProvideOptions};
//! use std::sync::Arc;
//!
//! struct Greeter;
//! struct App(Arc<Greeter>);
//!
//! let container = Container::new();
//! container.provide(|| Greeter, ProvideOptions::default()).unwrap();
//! container
//!     .provide(|g: Arc<Greeter>| App(g), ProvideOptions::default())
//!     .unwrap();
//! let app = container.resolve::<App>().unwrap();
//! let _ = app.0;
//! ```
//!
//! Multi-field results, named values, and value groups are declared with
//! [`define_params!`] and [`define_results!`] rather than attribute tags,
//! since Rust structs have no runtime-inspectable field metadata to tag.

mod component_lifetime;
pub use component_lifetime::Cl;

mod once;
pub use once::Once;

mod provider_fn;
pub use provider_fn::Provider;

mod lazy;
pub use lazy::Lazy;

// `pub` (rather than private `mod`) so that code generated by
// `define_params!`/`define_results!` at an external call site can name
// `$crate::key::ValueKey` and friends.
pub mod key;
pub use key::{GroupKey, Key, KeyList, TypeMeta, ValueKey};

mod group;
pub use group::Group;

pub mod error;
pub use error::{CyclePath, KeystoneError, Result};

mod cycle;

pub mod build;
pub use build::{ParamNode, ResultNode};

pub mod staging;
pub use staging::Staging;

pub mod object;
pub use object::{GroupParam, NamedParam, Param, ResultsObject};

mod constructor;
pub use constructor::ConstructorFn;

mod provider;
pub use provider::{ProviderId, ProviderNode};

mod options;
pub use options::{InvokeOptions, ProvideInfo, ProvideOptions};

pub mod container;
pub use container::{Container, Scope};
