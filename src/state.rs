use crate::config::AppConfig;
use crate::data::chart::{BarOrientation, PieKind};
use crate::data::model::Dataset;
use crate::data::profile::{ColumnClasses, DatasetProfile};

// ---------------------------------------------------------------------------
// Chart selections
// ---------------------------------------------------------------------------

/// Column and sub-type picks of every chart control.
///
/// Reset whenever a dataset is loaded, so each pick always names a column of
/// the current dataset (or is empty when no column of that class exists).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selections {
    pub histogram_column: String,
    pub value_count_column: String,
    pub bar_category: String,
    pub bar_value: String,
    pub bar_orientation: BarOrientation,
    pub pie_category: String,
    pub pie_value: String,
    pub pie_kind: PieKind,
    pub count_pie_category: String,
    pub outlier_column: String,
}

impl Selections {
    /// Default every pick to the first column of the matching class.
    pub fn for_classes(classes: &ColumnClasses) -> Self {
        let first_cat = classes.categorical.first().cloned().unwrap_or_default();
        let first_num = classes.numeric.first().cloned().unwrap_or_default();
        Self {
            histogram_column: first_num.clone(),
            value_count_column: first_cat.clone(),
            bar_category: first_cat.clone(),
            bar_value: first_num.clone(),
            bar_orientation: BarOrientation::default(),
            pie_category: first_cat.clone(),
            pie_value: first_num.clone(),
            pie_kind: PieKind::default(),
            count_pie_category: first_cat,
            outlier_column: first_num,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A status line shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Success(String),
    Error(String),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Profile of `dataset`; the dataset never changes after loading.
    pub profile: Option<DatasetProfile>,

    /// File name the dataset came from.
    pub source_name: Option<String>,

    pub selections: Selections,

    pub status: Option<Status>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dataset: None,
            profile: None,
            source_name: None,
            selections: Selections::default(),
            status: None,
        }
    }

    /// Ingest a newly loaded dataset: profile it and reset the chart controls.
    pub fn set_dataset(&mut self, dataset: Dataset, source_name: String) {
        let profile = DatasetProfile::compute(&dataset);
        self.selections = Selections::for_classes(&profile.classes);
        self.profile = Some(profile);
        self.dataset = Some(dataset);
        self.source_name = Some(source_name);
        self.status = Some(Status::Success("Dataset Loaded Successfully".to_string()));
    }

    /// Record a failed load; whatever was loaded before stays on screen.
    pub fn set_error(&mut self, message: String) {
        self.status = Some(Status::Error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    #[test]
    fn loading_picks_first_column_of_each_class() {
        let mut state = AppState::new(AppConfig::default());
        let ds = load_csv_bytes(b"id,city,temp,kind\n1,a,2.5,x\n2,b,3.5,y\n").unwrap();
        state.set_dataset(ds, "weather.csv".into());

        let sel = &state.selections;
        assert_eq!(sel.histogram_column, "id");
        assert_eq!(sel.bar_category, "city");
        assert_eq!(sel.pie_value, "id");
        assert_eq!(sel.count_pie_category, "city");
        assert_eq!(sel.bar_orientation, BarOrientation::Vertical);
        assert_eq!(
            state.status,
            Some(Status::Success("Dataset Loaded Successfully".into()))
        );
        assert_eq!(state.profile.as_ref().unwrap().rows, 2);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = AppState::new(AppConfig::default());
        let ds = load_csv_bytes(b"a\n1\n").unwrap();
        state.set_dataset(ds, "a.csv".into());
        state.set_error("Error: broken".into());
        assert!(state.dataset.is_some());
        assert_eq!(state.source_name.as_deref(), Some("a.csv"));
        assert!(matches!(state.status, Some(Status::Error(_))));
    }

    #[test]
    fn selections_are_empty_without_matching_columns() {
        let ds = load_csv_bytes(b"a,b\n1,2\n").unwrap();
        let classes = ColumnClasses::classify(&ds);
        let sel = Selections::for_classes(&classes);
        assert!(sel.bar_category.is_empty());
        assert_eq!(sel.outlier_column, "a");
    }
}
