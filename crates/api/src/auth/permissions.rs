use async_graphql::{Context, Error, Result};
use uuid::Uuid;

use crate::auth::Claims;
use crate::gql::common::types::Role;
use crate::state::AppState;

/// The authenticated caller, as asserted by the verified token. Role claims
/// are trusted as-is; the identity service owns the role assignment.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

pub fn require_claims<'a>(ctx: &'a Context<'_>) -> Result<&'a Claims> {
    ctx.data::<Claims>()
        .map_err(|_| Error::new("You must be logged in to perform this action"))
}

/// Check that the authenticated user carries the required role.
/// Hierarchy: admin > club > player.
pub fn require_role(ctx: &Context<'_>, required_role: Role) -> Result<AuthUser> {
    let claims = require_claims(ctx)?;

    let role = Role::from(claims.role.clone());
    if !has_required_role(&role, required_role) {
        return Err(Error::new(match required_role {
            Role::Admin => format!(
                "Access denied: Administrator privileges required. Your current role is {:?}",
                role
            ),
            Role::Club => format!(
                "Access denied: Club privileges required. Your current role is {:?}",
                role
            ),
            Role::Player => "Access denied: You need to be registered as a player".to_string(),
        }));
    }

    let id =
        Uuid::parse_str(&claims.sub).map_err(|e| Error::new(format!("Invalid user ID: {}", e)))?;

    Ok(AuthUser {
        id,
        email: claims.email.clone(),
        role,
    })
}

/// Booking is a player action: clubs and admins browse, players reserve.
pub fn require_player(ctx: &Context<'_>) -> Result<AuthUser> {
    let user = require_role(ctx, Role::Player)?;
    if user.role != Role::Player {
        return Err(Error::new(
            "Access denied: only players can book court time",
        ));
    }
    Ok(user)
}

/// Check that the authenticated user owns the given club (admins pass).
pub async fn require_club_owner(ctx: &Context<'_>, club_id: Uuid) -> Result<AuthUser> {
    let user = require_role(ctx, Role::Club)?;

    // Admin can act on any club
    if user.role == Role::Admin {
        return Ok(user);
    }

    let state = ctx.data::<AppState>()?;
    let club = infra::repos::clubs::get_by_id(&state.db, club_id)
        .await
        .map_err(|e| Error::new(format!("Database error: {}", e)))?
        .ok_or_else(|| Error::new("Club not found"))?;

    if club.owner_id != user.id {
        return Err(Error::new(
            "Access denied: you do not manage this club. Only administrators and the owning club can perform this action",
        ));
    }

    Ok(user)
}

pub fn require_admin(ctx: &Context<'_>) -> Result<AuthUser> {
    require_role(ctx, Role::Admin)
}

fn has_required_role(user_role: &Role, required_role: Role) -> bool {
    match required_role {
        Role::Admin => *user_role == Role::Admin,
        Role::Club => *user_role == Role::Club || *user_role == Role::Admin,
        Role::Player => true, // Any authenticated caller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_hierarchy() {
        assert!(has_required_role(&Role::Admin, Role::Admin));
        assert!(has_required_role(&Role::Admin, Role::Club));
        assert!(has_required_role(&Role::Admin, Role::Player));
        assert!(!has_required_role(&Role::Club, Role::Admin));
        assert!(has_required_role(&Role::Club, Role::Club));
        assert!(!has_required_role(&Role::Player, Role::Club));
        assert!(has_required_role(&Role::Player, Role::Player));
    }
}
