//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user endpoint, the health endpoint and the
//! envelope schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI
//! serves it in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::health::HealthReport;
use crate::inbound::http::schemas::{
    FailureEnvelopeSchema, UserEnvelopeSchema, UserListEnvelopeSchema, UserSchema,
};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User registry API",
        description = "CRUD interface over a bounded, in-memory user collection."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::put_user,
        crate::inbound::http::users::patch_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::health,
    ),
    components(schemas(
        UserSchema,
        UserEnvelopeSchema,
        UserListEnvelopeSchema,
        FailureEnvelopeSchema,
        CreateUserRequest,
        UpdateUserRequest,
        HealthReport
    )),
    tags(
        (name = "users", description = "Operations on the user collection"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const USER_SCHEMA_NAME: &str = "crate.domain.User";
    const FAILURE_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn user_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user = schemas.get(USER_SCHEMA_NAME).expect("User schema");
        for field in ["id", "name", "email"] {
            assert_object_schema_has_field(user, field);
        }
    }

    #[test]
    fn failure_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let failure = schemas.get(FAILURE_SCHEMA_NAME).expect("failure schema");
        for field in ["success", "message", "error"] {
            assert_object_schema_has_field(failure, field);
        }
    }

    #[test]
    fn every_user_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/users"));
        assert!(paths.contains_key("/api/users/{id}"));
        assert!(paths.contains_key("/health"));
        let item = paths.get("/api/users/{id}").expect("item path");
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.patch.is_some());
        assert!(item.delete.is_some());
    }
}
