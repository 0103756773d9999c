//! # cfggen - configuration generation for multi-ASIC network devices
//!
//! cfggen derives the configuration tables of a network device from a
//! minigraph topology, static port configuration and override files, then
//! prints one variable, the whole data set, or rendered templates.
//!
//! A multi-ASIC chassis is configured as several instances: the host and
//! one per internal ASIC. Each instance sees only its own part of the
//! topology.
//!
//! ## Architecture Overview
//!
//! ```text
//! minigraph.xml ──► graph::Graph ──► instance::Resolver ──► FilteredView
//!                                          ▲                     │
//!                 port_config.ini ─────────┘                     ▼
//!                                                         tables::build
//!                                                               │
//!        -y / -j / -a overrides ──────────► vars::VarStore ◄────┘
//!                                                │
//!                                                ▼
//!                                       output::Projector ──► stdout
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use cfggen::prelude::*;
//!
//! let invocation = Invocation {
//!     minigraph: Some("minigraph.xml".into()),
//!     port_config: Some("port_config-0.ini".into()),
//!     instance: "asic0".parse()?,
//!     request: Request::VarJson("PORTCHANNEL".to_string()),
//!     ..Default::default()
//! };
//! print!("{}", run(&invocation, &Config::default())?);
//! # Ok::<(), cfggen::error::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod instance;
pub mod minigraph;
pub mod output;
pub mod pipeline;
pub mod ports;
pub mod tables;
pub mod template;
pub mod vars;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::graph::{Device, Graph, GraphBuilder, Link, SubRole};
    pub use crate::instance::{FilteredView, InstanceSelector, Resolver, RoleMap, SubRoleLookup};
    pub use crate::output::Request;
    pub use crate::pipeline::{build_context, run, Invocation};
    pub use crate::ports::PortConfig;
    pub use crate::vars::{ConfigContext, Layer, MergeMode, SourcePrecedence, VarStore};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
