//! Diesel table definitions matching `backend/migrations`.

diesel::table! {
    /// Registered accounts. `email` is stored normalised and is unique.
    users (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pages, each owned by exactly one user.
    pages (id) {
        id -> Int8,
        title -> Varchar,
        content -> Text,
        user_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(pages -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, pages);
