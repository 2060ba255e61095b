//! User service used by the integration tests.

/**
    @API Test API
    @Version 1.0.0
    @Server https://example.com/
        Production API Server
    @Server https://{env}.example.com/
        Internal API Server
        @Variable env staging dev qa staging
            Environment ID

    @SecuritySchemeAPIKey admin_key header X-Admin-Key
        Key for administrative operations
    @SecuritySchemeHTTP access_token Bearer JWT
        Access Token
    @SecurityRequirement access_token

    @Tag User
        User APIs
*/
pub fn main() {}

/// @Parameter id path
///     ID of user in UUID format.
///     @JSONSchema
///         { "type": "string" }
pub type UserId = String;

/// @JSONSchema
pub const USER_SCHEMA: &str = r##"
{
    "$id": "#User",
    "type": "object",
    "properties": {
        "id": { "type": "string" },
        "name": { "type": "string" }
    }
}
"##;

pub struct User {
    pub id: String,
    pub name: String,
}

/// @ID UserResponse
/// @Response
///     Describe user information.
///     @JSONSchema
///         {
///             "type": "object",
///             "properties": {
///                 "user": { "$ref": "#User" }
///             }
///         }
///     @JSONExample User - Example User
///         {
///             "user": {
///                 "id": "C9D3C933-E1BC-46CC-B8F9-057951DD63B0",
///                 "name": "Test User"
///             }
///         }
pub struct UserResponseBody {
    pub user: User,
}

pub mod handlers {
    use super::*;

    /// @Operation GET /user/{id} - Get User
    ///     Return user with specific ID.
    ///
    ///     If `id` parameter is "me", returns the calling user.
    ///
    ///     @Tag User
    ///
    ///     @Parameter {UserId}
    ///     @Response 200 {UserResponse}
    pub fn get_user(_id: UserId) -> UserResponseBody {
        unimplemented!()
    }

    /// @Operation POST /user - Create User
    ///     Create new user with specified information.
    ///
    ///     @Tag User
    ///     @SecurityRequirement admin_key
    ///
    ///     @RequestBody
    ///         Describe information of the user.
    ///         @JSONSchema
    ///             {
    ///                 "type": "object",
    ///                 "properties": {
    ///                     "name": { "type": "string" }
    ///                 }
    ///             }
    ///         @JSONExample TestUser - User with name 'Test'
    ///             {
    ///                 "name": "Test"
    ///             }
    ///     @Response 200 {UserResponse}
    ///     @Response 403
    ///         Client is not authorized to create user.
    ///
    ///     @Callback user_created
    ///         @Operation POST /events/user_created - User created
    ///             Sent after a user has been created.
    ///
    ///             @RequestBody
    ///                 @JSONSchema {User}
    ///             @Response 200
    ///                 Acknowledge the event.
    pub fn create_user(_user: User) -> UserResponseBody {
        unimplemented!()
    }
}
