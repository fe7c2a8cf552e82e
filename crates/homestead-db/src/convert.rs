//! Conversions between domain values and column values.
//!
//! Snowflakes and amounts are unsigned in the domain and `BIGINT` in the
//! database. Anything that does not fit is an error, never a wrap.

use homestead_types::{AnimalType, BoardPosition, GuildId, PlotType, UserId};

use crate::error::DbError;

pub(crate) fn user_to_db(user: UserId) -> Result<i64, DbError> {
    i64::try_from(user.get()).map_err(|_err| DbError::OutOfRange(format!("user id {user}")))
}

pub(crate) fn guild_to_db(guild: GuildId) -> Result<i64, DbError> {
    i64::try_from(guild.get()).map_err(|_err| DbError::OutOfRange(format!("guild id {guild}")))
}

pub(crate) fn snowflake_from_db(raw: i64) -> Result<u64, DbError> {
    u64::try_from(raw).map_err(|_err| DbError::Decode(format!("negative snowflake {raw}")))
}

pub(crate) fn amount_to_db(amount: u64) -> Result<i64, DbError> {
    i64::try_from(amount).map_err(|_err| DbError::OutOfRange(format!("amount {amount}")))
}

pub(crate) fn amount_from_db(raw: i64) -> Result<u64, DbError> {
    u64::try_from(raw).map_err(|_err| DbError::Decode(format!("negative amount {raw}")))
}

pub(crate) fn position_to_db(position: BoardPosition) -> (i16, i16) {
    (i16::from(position.x()), i16::from(position.y()))
}

pub(crate) fn position_from_db(x: i16, y: i16) -> Result<BoardPosition, DbError> {
    BoardPosition::new(i64::from(x), i64::from(y)).map_err(|e| DbError::Decode(e.to_string()))
}

pub(crate) const fn plot_type_to_db(plot_type: PlotType) -> &'static str {
    plot_type.key()
}

pub(crate) fn plot_type_from_db(raw: &str) -> Result<PlotType, DbError> {
    PlotType::from_key(raw).map_err(|e| DbError::Decode(e.to_string()))
}

pub(crate) const fn animal_type_to_db(animal_type: AnimalType) -> &'static str {
    animal_type.key()
}

pub(crate) fn animal_type_from_db(raw: &str) -> Result<AnimalType, DbError> {
    AnimalType::from_key(raw).map_err(|e| DbError::Decode(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_above_i64_are_rejected() {
        assert_eq!(user_to_db(UserId(42)).unwrap(), 42);
        assert!(matches!(
            user_to_db(UserId(u64::MAX)),
            Err(DbError::OutOfRange(_))
        ));
        assert!(matches!(snowflake_from_db(-1), Err(DbError::Decode(_))));
    }

    #[test]
    fn amounts_never_wrap() {
        assert!(amount_to_db(u64::MAX).is_err());
        assert!(amount_from_db(-5).is_err());
        assert_eq!(amount_from_db(7).unwrap(), 7);
    }

    #[test]
    fn stored_keys_decode() {
        for plot_type in PlotType::ALL {
            assert_eq!(plot_type_from_db(plot_type_to_db(plot_type)).unwrap(), plot_type);
        }
        assert!(animal_type_from_db("dodo").is_err());
        assert!(position_from_db(5, 0).is_err());
    }
}
