use crate::{GameError, Result};
use diceduel_core::{Connection, Message};

/// What a peer announces about itself before the first round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub name: String,
    pub balance: i64,
}

/// Sends our NAME and starting BALANCE, then reads the peer's.
pub async fn greet(conn: &mut Connection, name: &str, balance: i64) -> Result<Greeting> {
    conn.send(&Message::Name(name.to_string())).await?;
    conn.send(&Message::Balance(balance)).await?;

    let name = match conn.recv().await? {
        Message::Name(name) => name.trim().to_string(),
        Message::Exit(reason) => return Err(GameError::PeerExit(reason)),
        other => {
            return Err(GameError::malformed(format!(
                "expected NAME, got {}",
                other.kind()
            )))
        }
    };
    if name.is_empty() {
        return Err(GameError::malformed("peer sent an empty name"));
    }

    let balance = match conn.recv().await? {
        Message::Balance(balance) => balance,
        Message::Exit(reason) => return Err(GameError::PeerExit(reason)),
        other => {
            return Err(GameError::malformed(format!(
                "expected BALANCE, got {}",
                other.kind()
            )))
        }
    };

    tracing::info!("Playing with {} (balance {})", name, balance);
    Ok(Greeting { name, balance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use diceduel_core::{DuelError, Received};

    #[tokio::test]
    async fn test_greeting_exchange() {
        let (mut conn, script) = scripted_connection(vec![
            Received::Wait,
            Received::Line("NAME| bob ".to_string()),
            Received::Wait,
            Received::Line("BALANCE|150".to_string()),
        ]);

        let greeting = greet(&mut conn, "alice", 100).await.unwrap();
        assert_eq!(
            greeting,
            Greeting {
                name: "bob".to_string(),
                balance: 150
            }
        );
        assert_eq!(script.sent(), vec!["NAME|alice", "BALANCE|100"]);
    }

    #[tokio::test]
    async fn test_exit_during_greeting() {
        let (mut conn, _) = scripted_connection(lines(&["EXIT|changed my mind"]));
        assert!(matches!(
            greet(&mut conn, "alice", 100).await,
            Err(GameError::PeerExit(reason)) if reason == "changed my mind"
        ));
    }

    #[tokio::test]
    async fn test_round_message_before_name() {
        let (mut conn, _) = scripted_connection(lines(&["GUESS|3"]));
        assert!(matches!(
            greet(&mut conn, "alice", 100).await,
            Err(GameError::Core(DuelError::Malformed(_)))
        ));

        let (mut conn, _) = scripted_connection(lines(&["NAME|   "]));
        assert!(greet(&mut conn, "alice", 100).await.is_err());
    }
}
