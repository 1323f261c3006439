use crate::error::ResolverError;

/// Names of the local interfaces the daemon should query on.
///
/// With an empty allow-list every interface the host reports is used.
pub fn select_interfaces(allow: &[String]) -> Result<Vec<String>, ResolverError> {
    let ifaces = if_addrs::get_if_addrs().map_err(|e| {
        ResolverError::InitializationFailed(format!("failed to enumerate local interfaces: {e}"))
    })?;

    let selected = filter_names(ifaces.into_iter().map(|iface| iface.name), allow);
    if selected.is_empty() {
        return Err(ResolverError::InitializationFailed(if allow.is_empty() {
            "no local network interfaces found".to_string()
        } else {
            format!("none of the configured interfaces {allow:?} exist")
        }));
    }

    Ok(selected)
}

/// One entry per interface name (hosts report a name once per address),
/// restricted to `allow` when it is non-empty.
fn filter_names(names: impl Iterator<Item = String>, allow: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for name in names {
        if selected.contains(&name) {
            continue;
        }
        if allow.is_empty() || allow.contains(&name) {
            selected.push(name);
        }
    }
    selected
}
