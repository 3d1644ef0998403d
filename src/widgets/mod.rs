pub mod bar_chart;
pub mod chart_common;
pub mod controls;
pub mod line_chart;
pub mod pagination;
pub mod states;
pub mod summary;
