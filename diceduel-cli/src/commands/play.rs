use crate::display;
use crate::prompt::{self, TerminalDecider};
use diceduel_core::{GameConfig, TcpTransport, Transport};
use diceduel_game::{Result, Role, Session};
use std::net::{IpAddr, SocketAddr};

pub async fn handle_host(config: &GameConfig, name: Option<String>) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => prompt::ask_name("Host")?,
    };

    println!("[Host] Waiting for a player on port {}...", config.port);
    let transport = TcpTransport::listen(config.port).await?;
    println!("[Host] Player connected from {}", transport.peer_addr());

    play(Box::new(transport), config, &name, Role::Host).await
}

pub async fn handle_join(config: &GameConfig, address: &str, name: Option<String>) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => prompt::ask_name("Guest")?,
    };

    let target = target_address(address, config.port);
    println!("[Guest] Connecting to {}...", target);
    let transport = TcpTransport::connect(target.as_str()).await?;
    println!("[Guest] Connected.");

    play(Box::new(transport), config, &name, Role::Guest).await
}

async fn play(
    transport: Box<dyn Transport>,
    config: &GameConfig,
    name: &str,
    role: Role,
) -> Result<()> {
    let mut session = Session::establish(transport, config, name, role).await?;

    println!();
    println!("Welcome to Dice Duel over LAN!");
    println!(
        "Playing against {} (${})",
        session.remote().name(),
        session.remote().balance()
    );
    if role == Role::Host {
        println!("You are the host: you roll the die each round.");
    }

    let mut decider = TerminalDecider::new(session.remote().name());
    let outcome = session.run(&mut decider).await?;
    display::print_outcome(&outcome);

    Ok(())
}

/// Appends the default port unless the address already names one.
fn target_address(address: &str, port: u16) -> String {
    let address = address.trim();
    if let Ok(addr) = address.parse::<SocketAddr>() {
        return addr.to_string();
    }
    if let Ok(ip) = address.parse::<IpAddr>() {
        return SocketAddr::new(ip, port).to_string();
    }
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_address() {
        assert_eq!(target_address("192.168.1.4", 5000), "192.168.1.4:5000");
        assert_eq!(target_address("192.168.1.4:6000", 5000), "192.168.1.4:6000");
        assert_eq!(target_address("::1", 5000), "[::1]:5000");
        assert_eq!(target_address("gamebox", 5000), "gamebox:5000");
        assert_eq!(target_address("gamebox:7000", 5000), "gamebox:7000");
    }
}
