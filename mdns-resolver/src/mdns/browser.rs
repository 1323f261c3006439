use std::net::{IpAddr, Ipv4Addr};
use futures::future::BoxFuture;
use mdns_sd::{IfKind, ServiceDaemon, ServiceEvent, ServiceInfo};
use tokio::sync::mpsc;
use tokio::time::Instant;
use shared::types::DiscoveredRecord;
use crate::discovery::DiscoveryClient;
use crate::error::{DiscoveryError, ResolverError};
use crate::locator::Locator;
use super::interfaces::select_interfaces;

/// Discovery backed by an `mdns-sd` daemon bound to selected local interfaces.
pub struct MdnsDiscovery {
    daemon: ServiceDaemon,
}

impl MdnsDiscovery {
    /// Start a daemon that only queries on `allow` (or every interface if empty).
    pub fn bind(allow: &[String]) -> Result<Self, ResolverError> {
        let interfaces = select_interfaces(allow)?;

        let daemon = ServiceDaemon::new().map_err(|e| {
            ResolverError::InitializationFailed(format!("failed to create mDNS daemon: {e}"))
        })?;
        if let Err(e) = enable_only(&daemon, &interfaces) {
            let _ = daemon.shutdown();
            return Err(e);
        }

        tracing::info!("mDNS discovery bound to {}", interfaces.join(", "));
        Ok(Self { daemon })
    }

    async fn browse_until(
        &self,
        locator: &Locator,
        deadline: Instant,
        entries: mpsc::Sender<DiscoveredRecord>,
    ) -> Result<usize, DiscoveryError> {
        let service_type = locator.service_type();
        let fullname = locator.fullname();
        let receiver = self.daemon.browse(&service_type)?;
        tracing::debug!("Browsing {} for {}", service_type, fullname);

        let mut delivered = 0usize;
        loop {
            let event = match tokio::time::timeout_at(deadline, receiver.recv_async()).await {
                Ok(Ok(event)) => event,
                Ok(Err(flume::RecvError::Disconnected)) => {
                    tracing::debug!("mDNS daemon closed the browse channel for {}", service_type);
                    break;
                }
                Err(_) => break,
            };

            if let ServiceEvent::ServiceResolved(info) = event {
                if !info.get_fullname().eq_ignore_ascii_case(&fullname) {
                    continue;
                }
                if entries.send(convert_service_info(&info)).await.is_err() {
                    break;
                }
                delivered += 1;
            }
        }

        if let Err(e) = self.daemon.stop_browse(&service_type) {
            tracing::debug!("Failed to stop browsing {}: {}", service_type, e);
        }

        if delivered == 0 {
            return Err(DiscoveryError::Timeout);
        }
        Ok(delivered)
    }
}

impl DiscoveryClient for MdnsDiscovery {
    fn lookup<'a>(
        &'a self,
        locator: &'a Locator,
        deadline: Instant,
        entries: mpsc::Sender<DiscoveredRecord>,
    ) -> BoxFuture<'a, Result<usize, DiscoveryError>> {
        Box::pin(self.browse_until(locator, deadline, entries))
    }

    fn shutdown(&self) {
        if let Err(e) = self.daemon.shutdown() {
            tracing::error!("Failed to shutdown mDNS daemon: {}", e);
        }
    }
}

fn enable_only(daemon: &ServiceDaemon, interfaces: &[String]) -> Result<(), ResolverError> {
    daemon.disable_interface(IfKind::All).map_err(|e| {
        ResolverError::InitializationFailed(format!("failed to disable default interfaces: {e}"))
    })?;
    for name in interfaces {
        daemon.enable_interface(name.as_str()).map_err(|e| {
            ResolverError::InitializationFailed(format!("failed to enable interface {name}: {e}"))
        })?;
    }
    Ok(())
}

/// Convert an mdns-sd ServiceInfo to a DiscoveredRecord
fn convert_service_info(info: &ServiceInfo) -> DiscoveredRecord {
    // mdns-sd keeps addresses in a set; sort for a stable order
    let mut addr_ipv4: Vec<Ipv4Addr> = info
        .get_addresses()
        .iter()
        .filter_map(|addr| match addr {
            IpAddr::V4(ipv4) => Some(*ipv4),
            _ => None,
        })
        .collect();
    addr_ipv4.sort();

    let txt = info
        .get_properties()
        .iter()
        .map(|prop| (prop.key().to_string(), prop.val_str().to_string()))
        .collect();

    DiscoveredRecord {
        instance_name: info.get_fullname().to_string(),
        hostname: info.get_hostname().to_string(),
        addr_ipv4,
        port: info.get_port(),
        txt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_convert_keeps_ipv4_only_sorted() {
        let info = ServiceInfo::new(
            "_svc._tcp.local.",
            "instance1",
            "host.local.",
            "10.0.0.2,fe80::1,10.0.0.1",
            50051,
            HashMap::from([("path".to_string(), "/api".to_string())]),
        )
        .unwrap();

        let record = convert_service_info(&info);

        assert_eq!(record.instance_name, "instance1._svc._tcp.local.");
        assert_eq!(
            record.addr_ipv4,
            vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]
        );
        assert_eq!(record.port, 50051);
        assert_eq!(record.txt.get("path").map(String::as_str), Some("/api"));
    }
}
