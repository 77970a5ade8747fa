//! Thinning schedule validation.

use polars::prelude::DataFrame;
use tracing::debug;

use tpg_model::{
    DEFAULT_THINNING_RATIO, PrepareError, Result, SpeciesSet, TableKind, ThinningEvent,
    ThinningSchedule,
};

use crate::frame::TableView;

/// Columns a non-empty thinning table must carry.
pub const THINNING_COLUMNS: [&str; 3] = ["species", "age", "stems_n"];

/// Removal-ratio columns, each defaulting to [`DEFAULT_THINNING_RATIO`].
pub const RATIO_COLUMNS: [&str; 3] = ["foliage", "root", "stem"];

/// Build the thinning schedule. A missing or empty table yields an empty
/// schedule.
///
/// Events are ordered by species (species-table order), then age.
pub fn build_thinning_schedule(
    df: Option<&DataFrame>,
    species: &SpeciesSet,
    log_defaults: bool,
) -> Result<ThinningSchedule> {
    let Some(df) = df.filter(|df| df.height() > 0) else {
        debug!("no thinning supplied");
        return Ok(ThinningSchedule::empty());
    };

    let view = TableView::new(TableKind::Thinning, df);
    view.require_columns(&THINNING_COLUMNS)?;

    let mut keyed = Vec::with_capacity(view.height());
    let mut defaulted_ratios = 0usize;
    for row in 0..view.height() {
        let name = view.text_at("species", row)?;
        let Some(position) = species.position(&name) else {
            return Err(PrepareError::UnknownSpecies {
                table: TableKind::Thinning,
                species: name,
            });
        };

        let non_negative = |field: &str, value: f64| -> Result<f64> {
            if value < 0.0 {
                return Err(view.out_of_range(field, value, "must not be negative"));
            }
            Ok(value)
        };
        let age = non_negative("age", view.f64_at("age", row)?)?;
        let stems_n = non_negative("stems_n", view.f64_at("stems_n", row)?)?;

        let mut ratios = [DEFAULT_THINNING_RATIO; 3];
        for (ratio, field) in ratios.iter_mut().zip(RATIO_COLUMNS) {
            match view.opt_f64_at(field, row)? {
                Some(value) => *ratio = non_negative(field, value)?,
                None => defaulted_ratios += 1,
            }
        }
        let [foliage, root, stem] = ratios;

        keyed.push((
            position,
            ThinningEvent {
                species: name,
                age,
                stems_n,
                foliage,
                root,
                stem,
            },
        ));
    }

    keyed.sort_by(|(a_pos, a), (b_pos, b)| a_pos.cmp(b_pos).then(a.age.total_cmp(&b.age)));
    if let Some(pair) = keyed
        .windows(2)
        .find(|pair| pair[0].0 == pair[1].0 && pair[0].1.age == pair[1].1.age)
    {
        let event = &pair[1].1;
        return Err(view.out_of_range(
            "age",
            event.age,
            format!("thinned twice for species '{}'", event.species),
        ));
    }

    if log_defaults && defaulted_ratios > 0 {
        debug!(
            cells = defaulted_ratios,
            ratio = DEFAULT_THINNING_RATIO,
            "thinning ratios defaulted"
        );
    }
    debug!(events = keyed.len(), "thinning schedule built");

    Ok(ThinningSchedule {
        events: keyed.into_iter().map(|(_, event)| event).collect(),
    })
}
