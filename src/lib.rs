//! # subwarp
//!
//! Browse historical subreddit snapshots as of any point in time.
//!
//! subwarp is a client for a snapshot service that can materialize a whole
//! subreddit as it existed at an arbitrary anchor timestamp. The crate owns
//! the temporal retrieval and pagination engine: turning a session (subreddit,
//! anchor, sort, lookback window) into well-formed page requests, loading
//! pages incrementally with dedup and end-of-data detection, and resolving a
//! title or episode release date into an anchor timestamp to warp to.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  warp   ┌──────────────────────┐  ticket  ┌────────────┐
//! │ SessionState │───────▶│ PaginationController │─────────▶│ WarpClient │
//! └─────────────┘         │  (items, has_more)   │◀─────────│  (HTTP)    │
//!        ▲                └──────────────────────┘ complete └────────────┘
//!        │ anchor                                                │
//! ┌──────┴───────┐                                        snapshot service
//! │ warp_target  │◀── release dates ── MetadataClient
//! └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration (service URLs, timeouts) |
//! | [`models`] | Submissions, sort modes, page envelopes |
//! | [`session`] | Canonical browsing parameters and warp setters |
//! | [`timerange`] | Relative period → absolute time window |
//! | [`client`] | Snapshot service HTTP client and query builder |
//! | [`names`] | Once-per-process subreddit name cache |
//! | [`pagination`] | Incremental loading state machine and driver |
//! | [`metadata`] | Title search and episode listing |
//! | [`warp_target`] | Release date → anchor timestamp |

pub mod client;
pub mod config;
pub mod metadata;
pub mod models;
pub mod names;
pub mod pagination;
pub mod session;
pub mod timerange;
pub mod warp_target;
