//! `s2h info`: describe a saved bundle.

use std::path::Path;

use stress2health::encoder::FEATURE_NAMES;
use stress2health::serialization::ModelBundle;

use super::require_exists;
use crate::error::Result;
use crate::output;

pub(crate) fn run(bundle: &Path, json: bool) -> Result<()> {
    require_exists(bundle)?;
    let info = ModelBundle::inspect(bundle)?;
    if json {
        return output::json(&info);
    }

    output::section("Bundle");
    output::kv("Directory", bundle.display());
    output::kv("Format version", info.version);
    output::kv("Fingerprint", &info.fingerprint);
    output::kv("Model", info.model_kind);
    output::kv("Classes", info.classes.join(", "));

    output::section("Scaler");
    for (i, name) in FEATURE_NAMES.iter().enumerate() {
        let mean = info.scaler_mean.get(i).copied().unwrap_or(f32::NAN);
        let std = info.scaler_std.get(i).copied().unwrap_or(f32::NAN);
        output::kv(name, format!("mean {mean:.3}, std {std:.3}"));
    }
    output::success("all artifacts present and consistent");
    Ok(())
}
