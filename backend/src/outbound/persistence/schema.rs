//! Diesel table definitions.
//!
//! Must match `backend/migrations`. Every guarded resource table carries the
//! owning account in `user_id`.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        role -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    photos (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        caption -> Varchar,
        photo_url -> Varchar,
    }
}

diesel::table! {
    comments (id) {
        id -> Int8,
        user_id -> Int8,
        photo_id -> Int8,
        message -> Text,
    }
}

diesel::table! {
    social_medias (id) {
        id -> Int8,
        user_id -> Int8,
        name -> Varchar,
        social_media_url -> Varchar,
    }
}

diesel::table! {
    tasks (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        description -> Text,
        status -> Bool,
    }
}

diesel::table! {
    categories (id) {
        id -> Int8,
        user_id -> Int8,
        category_type -> Varchar,
    }
}

diesel::table! {
    products (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        price -> Int8,
    }
}

diesel::joinable!(photos -> users (user_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(social_medias -> users (user_id));
diesel::joinable!(tasks -> users (user_id));
diesel::joinable!(categories -> users (user_id));
diesel::joinable!(products -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    photos,
    comments,
    social_medias,
    tasks,
    categories,
    products,
);
