//! Command plan for the proxy rewrite

use proxyfleet_domain::constants::{PROXY_HOSTNAME_VALUE, PROXY_PORT_VALUE};
use proxyfleet_domain::{CommandKind, ProxyTarget, RegistryStore, RemoteCommand, StorePlan};

/// Build the ordered command list for every store
///
/// Per store: one deletion per configured key in configured order, then the
/// hostname value, then the port value. Deletions come first because they
/// touch the same keys the set commands write.
pub fn build_plan(stores: &[RegistryStore], proxy: &ProxyTarget) -> Vec<StorePlan> {
    stores
        .iter()
        .map(|store| {
            let mut commands: Vec<RemoteCommand> =
                store.delete_keys.iter().map(|key| delete_command(&store.path, key)).collect();
            commands.push(set_hostname_command(&store.path, &proxy.hostname));
            commands.push(set_port_command(&store.path, proxy.port));

            StorePlan { store: store.path.clone(), commands }
        })
        .collect()
}

fn delete_command(store: &str, key: &str) -> RemoteCommand {
    RemoteCommand {
        kind: CommandKind::RegDelete,
        command_line: format!("reg delete {store} {key}"),
        store: store.to_string(),
        key: key.to_string(),
    }
}

fn set_hostname_command(store: &str, hostname: &str) -> RemoteCommand {
    RemoteCommand {
        kind: CommandKind::RegSet,
        command_line: format!(
            "reg set {store} {PROXY_HOSTNAME_VALUE} -ValueType=REG_SZ -Value={hostname}"
        ),
        store: store.to_string(),
        key: PROXY_HOSTNAME_VALUE.to_string(),
    }
}

fn set_port_command(store: &str, port: u16) -> RemoteCommand {
    RemoteCommand {
        kind: CommandKind::RegSet,
        command_line: format!(
            "reg set {store} {PROXY_PORT_VALUE} -ValueType=REG_DWORD -Value={port}"
        ),
        store: store.to_string(),
        key: PROXY_PORT_VALUE.to_string(),
    }
}
