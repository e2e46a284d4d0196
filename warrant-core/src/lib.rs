// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permission grant model and resolution for subjects partitioned into scopes.
//!
//! A subject holds its own display [`AttributeSet`] and explicit [`Grant`]s and is a member of any
//! number of prioritized [`Group`]s. [`resolve`] flattens all of it, for one scope, into a
//! [`ResolvedView`] which answers capability checks by exact lookup or, failing that, by matching
//! the most specific [`PermissionPattern`] it contains.
//!
//! ```
//! use warrant_core::{AttributeSet, Grant, GrantId, Group, ScopeId, resolve};
//!
//! let world_a = ScopeId::new("worldA");
//!
//! let default = Group::new("default", 0)
//!     .unwrap()
//!     .with_default(true)
//!     .with_grant(Grant::parse(GrantId::new(1), "chest.*", None, true, 0).unwrap());
//! let vip = Group::new("vip", 10).unwrap().with_grant(
//!     Grant::parse(GrantId::new(2), "chest.gold", Some(world_a.clone()), false, 10).unwrap(),
//! );
//!
//! let view = resolve('a', Some(&world_a), &AttributeSet::empty(), &[], &[vip, default]);
//! assert!(!view.check("chest.gold"));
//! assert!(view.check("chest.iron"));
//! ```
mod attributes;
mod grant;
mod group;
mod identity;
mod pattern;
pub mod record;
mod resolver;
mod view;

pub use attributes::AttributeSet;
pub use grant::{EXPLICIT_PRIORITY, Grant, GrantId};
pub use group::{Group, GroupName, GroupNameError, sort_by_priority};
pub use identity::{ScopeId, SubjectId, display_scope};
pub use pattern::{PatternError, PermissionPattern, SEPARATOR, Token, WILDCARD};
pub use record::{GrantRecord, GroupRecord, hydrate_explicit, hydrate_groups};
pub use resolver::{resolve, resolve_attributes};
pub use view::ResolvedView;
