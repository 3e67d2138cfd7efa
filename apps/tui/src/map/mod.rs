mod choropleth;
mod topology;

pub use choropleth::{
    fill_color, intensity_color, ChoroplethMap, ClickOutcome, CountryInfo, CountrySelection,
    MapState, AVAILABLE_COLOR, HIGHLIGHT_COLOR, HIGHLIGHT_DURATION, INTENSITY_PALETTE,
    INTENSITY_THRESHOLDS, NO_DATA_COLOR, SELECTED_COLOR,
};
pub use topology::{
    feature_code, feature_name, load_topology, CountryFeature, TopologySource, WorldTopology,
    CODE_PROPERTIES,
};

#[cfg(test)]
pub(crate) use topology::fixtures;
