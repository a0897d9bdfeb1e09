//! Client-side chart scripts, embedded at compile time.
//!
//! The D3 renderers are split across `assets/js/*.js` as plain global
//! functions (no ES modules). They are concatenated into one script served
//! at `/assets/dashboard.js`; `dashboard.js` goes last because it calls
//! the others on `DOMContentLoaded`.

pub static DASHBOARD_JS: &str = concat!(
    include_str!("../assets/js/tooltip.js"),
    "\n",
    include_str!("../assets/js/axes.js"),
    "\n",
    include_str!("../assets/js/line-chart.js"),
    "\n",
    include_str!("../assets/js/dual-axis-chart.js"),
    "\n",
    include_str!("../assets/js/scatter-chart.js"),
    "\n",
    include_str!("../assets/js/dashboard.js"),
);

pub const D3_URL: &str = "https://d3js.org/d3.v7.min.js";
