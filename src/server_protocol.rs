use serde_json::Value;

use crate::types::{Direction, Variant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameKind {
    Chase(Variant),
    Obstacle,
}

impl GameKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "obstacle" => Some(Self::Obstacle),
            other => Variant::parse(other).map(Self::Chase),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Chase(Variant::Classic) => "classic",
            Self::Chase(Variant::Wander) => "wander",
            Self::Obstacle => "obstacle",
        }
    }
}

#[derive(Debug)]
pub enum ParsedClientMessage {
    Start { game: GameKind, seed: Option<i64> },
    Input { dir: Direction },
    Flap,
    Restart,
    Ping { t: f64 },
}

pub fn parse_client_message(raw: &str) -> Option<ParsedClientMessage> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let message_type = object.get("type")?.as_str()?;

    match message_type {
        "start" => {
            let game = match object.get("game") {
                None => GameKind::Chase(Variant::Classic),
                Some(value) => GameKind::parse(value.as_str()?)?,
            };
            let seed = parse_optional_i64(object.get("seed"))?;
            Some(ParsedClientMessage::Start { game, seed })
        }
        "input" => {
            let dir = Direction::parse_move(object.get("dir")?.as_str()?)?;
            Some(ParsedClientMessage::Input { dir })
        }
        "flap" => Some(ParsedClientMessage::Flap),
        "restart" => Some(ParsedClientMessage::Restart),
        "ping" => {
            let t = object.get("t")?.as_f64()?;
            if !t.is_finite() {
                return None;
            }
            Some(ParsedClientMessage::Ping { t })
        }
        _ => None,
    }
}

fn parse_optional_i64(value: Option<&Value>) -> Option<Option<i64>> {
    const MAX_SAFE_INTEGER_F64: f64 = 9_007_199_254_740_991.0;

    let Some(value) = value else {
        return Some(None);
    };
    if let Some(number) = value.as_i64() {
        return Some(Some(number));
    }
    if let Some(number) = value.as_u64() {
        return i64::try_from(number).ok().map(Some);
    }
    if let Some(number) = value.as_f64() {
        if number.is_finite() {
            let floored = number.floor();
            if floored.abs() > MAX_SAFE_INTEGER_F64 {
                return None;
            }
            return Some(Some(floored as i64));
        }
    }
    None
}
