//! Location rows are shared by venues and artists and deduplicated by city.

use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::entities;
use crate::error::{BookingError, BookingResult};

/// Return the location for `city`, inserting it with `state` if the city is new.
///
/// An existing city keeps the state it was first stored with; the `state`
/// argument is only used on insert.
pub async fn find_or_create_by_city<C>(
    conn: &C,
    city: &str,
    state: &str,
) -> BookingResult<entities::location::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = entities::location::Entity::find()
        .filter(entities::location::Column::City.eq(city))
        .one(conn)
        .await?
    {
        if existing.state != state {
            log::debug!(
                "Location '{}' already stored with state '{}', ignoring '{}'",
                city,
                existing.state,
                state
            );
        }
        return Ok(existing);
    }

    log::debug!("Creating location: '{}, {}'", city, state);
    let location = entities::location::ActiveModel {
        city: Set(city.to_string()),
        state: Set(state.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    log::info!("Location created: '{}' (ID: {})", city, location.id);
    Ok(location)
}

/// Delete a location, refusing while any venue or artist still points at it.
pub async fn delete_if_unused<C>(conn: &C, location_id: i64) -> BookingResult<()>
where
    C: ConnectionTrait,
{
    entities::location::Entity::find_by_id(location_id)
        .one(conn)
        .await?
        .ok_or(BookingError::not_found("Location", location_id))?;

    let venues = entities::venue::Entity::find()
        .filter(entities::venue::Column::LocationId.eq(location_id))
        .count(conn)
        .await?;
    let artists = entities::artist::Entity::find()
        .filter(entities::artist::Column::LocationId.eq(location_id))
        .count(conn)
        .await?;

    if venues + artists > 0 {
        return Err(BookingError::LocationInUse(location_id));
    }

    entities::location::Entity::delete_by_id(location_id)
        .exec(conn)
        .await?;
    log::info!("Location deleted (ID: {})", location_id);
    Ok(())
}

/// Delete every location that no venue and no artist references.
/// Returns the number of rows removed.
pub async fn prune_unused<C>(conn: &C) -> BookingResult<u64>
where
    C: ConnectionTrait,
{
    let result = entities::location::Entity::delete_many()
        .filter(
            entities::location::Column::Id.not_in_subquery(
                Query::select()
                    .column(entities::venue::Column::LocationId)
                    .from(entities::venue::Entity)
                    .to_owned(),
            ),
        )
        .filter(
            entities::location::Column::Id.not_in_subquery(
                Query::select()
                    .column(entities::artist::Column::LocationId)
                    .from(entities::artist::Entity)
                    .to_owned(),
            ),
        )
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::venue::VenueService;
    use crate::test_utils::{new_venue, test_db};

    #[tokio::test]
    async fn test_find_or_create_twice_yields_one_row() {
        let db = test_db().await;

        let first = find_or_create_by_city(&db.conn, "San Francisco", "CA")
            .await
            .unwrap();
        let second = find_or_create_by_city(&db.conn, "San Francisco", "CA")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let count = entities::location::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_existing_city_keeps_its_state() {
        let db = test_db().await;

        find_or_create_by_city(&db.conn, "Springfield", "IL")
            .await
            .unwrap();
        let again = find_or_create_by_city(&db.conn, "Springfield", "MO")
            .await
            .unwrap();

        assert_eq!(again.state, "IL");
    }

    #[tokio::test]
    async fn test_distinct_cities_get_distinct_rows() {
        let db = test_db().await;

        let sf = find_or_create_by_city(&db.conn, "San Francisco", "CA")
            .await
            .unwrap();
        let ny = find_or_create_by_city(&db.conn, "New York", "NY")
            .await
            .unwrap();

        assert_ne!(sf.id, ny.id);
    }

    #[tokio::test]
    async fn test_delete_if_unused_refuses_referenced_location() {
        let db = test_db().await;
        let venue = VenueService::new(db.clone())
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let err = delete_if_unused(&db.conn, venue.location_id)
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::LocationInUse(id) if id == venue.location_id));
    }

    #[tokio::test]
    async fn test_delete_if_unused_removes_orphan() {
        let db = test_db().await;
        let location = find_or_create_by_city(&db.conn, "Austin", "TX")
            .await
            .unwrap();

        delete_if_unused(&db.conn, location.id).await.unwrap();

        let err = delete_if_unused(&db.conn, location.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_prune_unused_keeps_referenced_locations() {
        let db = test_db().await;
        VenueService::new(db.clone())
            .create(new_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        find_or_create_by_city(&db.conn, "Austin", "TX")
            .await
            .unwrap();
        find_or_create_by_city(&db.conn, "Boston", "MA")
            .await
            .unwrap();

        let removed = prune_unused(&db.conn).await.unwrap();

        assert_eq!(removed, 2);
        let remaining = entities::location::Entity::find()
            .all(&db.conn)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].city, "San Francisco");
    }
}
