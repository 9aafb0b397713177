use crate::action::Action;
use crate::config::{endpoint, AxisConfig, AxisName, Axes};

pub fn reduce(state: &Axes, action: &Action) -> Axes {
    match action {
        Action::AxisConfigScaleUpdate {
            axis_name, scale, ..
        } => update_axis(state, *axis_name, |axis| axis.scale = *scale),
        Action::AxisConfigXKeyUpdate {
            axis_name,
            x_axis_key,
            ..
        } => update_axis(state, *axis_name, |axis| {
            axis.x_axis_key = Some(x_axis_key.clone())
        }),
        Action::AxisConfigScaleRangeTypeUpdate {
            axis_name,
            scale,
            is_min,
            range_type,
            ..
        } => update_axis(state, *axis_name, |axis| {
            let scale = scale.unwrap_or(axis.scale);
            let range = axis.scale_range.entry(scale).or_default();
            range.range_types[endpoint(*is_min)] = *range_type;
        }),
        Action::AxisConfigScaleRangeNumberUpdate {
            axis_name,
            scale,
            is_min,
            range_number,
            ..
        } => update_axis(state, *axis_name, |axis| {
            let scale = scale.unwrap_or(axis.scale);
            let range = axis.scale_range.entry(scale).or_default();
            range.range[endpoint(*is_min)] = *range_number;
        }),
        Action::AxisConfigLogKeySelectToggle {
            axis_name, log_key, ..
        } => update_axis(state, *axis_name, |axis| {
            let key_config = axis.log_keys_config.entry(log_key.clone()).or_default();
            key_config.selected = !key_config.selected;
        }),
        _ => state.clone(),
    }
}

/// Replace one axis with an updated copy. Unseen axes start from an empty config.
fn update_axis(state: &Axes, name: AxisName, update: impl FnOnce(&mut AxisConfig)) -> Axes {
    let mut axis = state
        .get(&name)
        .cloned()
        .unwrap_or_else(|| AxisConfig::new(name));
    update(&mut axis);

    let mut next = state.clone();
    next.insert(name, axis);
    next
}
