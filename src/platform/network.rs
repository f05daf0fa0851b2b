// Interface addresses from sysinfo

use std::net::IpAddr;

use sysinfo::Networks;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub name: String,
    pub addr: IpAddr,
}

pub trait InterfaceSource {
    fn addresses(&mut self) -> Result<Vec<InterfaceAddress>>;
}

pub struct SysinfoInterfaces {
    networks: Networks,
}

impl SysinfoInterfaces {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoInterfaces {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceSource for SysinfoInterfaces {
    fn addresses(&mut self) -> Result<Vec<InterfaceAddress>> {
        self.networks.refresh(true);

        Ok(self
            .networks
            .iter()
            .flat_map(|(name, data)| {
                data.ip_networks().iter().map(move |net| InterfaceAddress {
                    name: name.to_string(),
                    addr: net.addr,
                })
            })
            .collect())
    }
}
