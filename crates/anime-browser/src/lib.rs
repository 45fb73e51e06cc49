//! Client-side browsing of the Kitsu anime catalog.
//!
//! The pipeline is fetch (via [`kitsu_client`]), filter, paginate and
//! present, orchestrated by [`SessionController`] and drawn by any
//! [`Renderer`].

pub mod filter;
pub mod paginate;
pub mod present;
pub mod render;
pub mod session;
pub mod terminal;

pub use filter::apply_filters;
pub use paginate::{paginate, Page, PaginationMeta};
pub use present::{CardProjection, DetailProjection, Formatter};
pub use render::Renderer;
pub use session::{
    LoadTicket, PageView, SelectError, SessionController, SessionState, SessionStatus,
    NO_RESULTS_MESSAGE,
};
pub use terminal::{Command, TerminalRenderer};
