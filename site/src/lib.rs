//! Client side of the hiking club site: the trail finder pipeline, the hike
//! grid and the hike calculator.

pub mod calculator;
pub mod config;
pub mod controller;
pub mod hikes;
pub mod preferences;
pub mod render;
pub mod transport;

pub use controller::{ControlView, SubmissionController, SubmissionState};
pub use preferences::{collect, CheckboxForm, FormSnapshot, PreferenceSet};
pub use render::{render_state, DisplayFragment, ResultView};
pub use transport::{HttpProxyTransport, ProxyTransport};
