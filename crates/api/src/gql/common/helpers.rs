use uuid::Uuid;

pub async fn get_club_id_for_court(
    db: &infra::db::Db,
    court_id: Uuid,
) -> async_graphql::Result<Uuid> {
    let court = infra::repos::courts::get_by_id(db, court_id)
        .await?
        .ok_or_else(|| async_graphql::Error::new("Court not found"))?;
    Ok(court.club_id)
}
