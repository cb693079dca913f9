//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes the schema, update this file by hand or regenerate it with
//! `diesel print-schema`.

diesel::table! {
    /// Student and admin accounts.
    ///
    /// `roll_number`, `username`, and `email` each carry a unique constraint.
    users (id) {
        /// Primary key.
        id -> Int4,
        /// Optional institution roll number.
        roll_number -> Nullable<Varchar>,
        /// Unique login name (max 64 characters).
        username -> Varchar,
        /// Unique contact address (max 255 characters).
        email -> Varchar,
        /// PHC-formatted argon2 hash; absent for roll-number accounts.
        password_hash -> Nullable<Text>,
        /// `user` or `admin`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dishes and drinks offered by the canteen.
    menu_items (id) {
        /// Primary key.
        id -> Int4,
        /// Display name (max 128 characters).
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Unit price, `NUMERIC(10, 2)`, always positive.
        price -> Numeric,
        /// Free-text grouping (max 64 characters).
        category -> Varchar,
        /// Optional image location.
        image_url -> Nullable<Text>,
        /// Whether the item can be ordered.
        available -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Placed orders.
    orders (id) {
        /// Primary key.
        id -> Int4,
        /// Owning user.
        user_id -> Int4,
        /// One of `pending`, `preparing`, `ready`, `completed`, `cancelled`.
        status -> Varchar,
        /// Total captured at creation, `NUMERIC(10, 2)`.
        total_amount -> Numeric,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last status change.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Order lines with the unit price captured at order time.
    order_items (id) {
        /// Primary key.
        id -> Int4,
        /// Parent order.
        order_id -> Int4,
        /// Referenced menu item.
        menu_item_id -> Int4,
        /// Positive quantity.
        quantity -> Int4,
        /// Unit price at order time.
        price -> Numeric,
    }
}

diesel::table! {
    /// Append-only audit log.
    user_logs (id) {
        /// Primary key.
        id -> Int8,
        /// Acting user.
        user_id -> Int4,
        /// Action tag such as `login` or `place_order`.
        action -> Varchar,
        /// Action-specific JSON payload.
        details -> Jsonb,
        /// Caller IP address.
        ip_address -> Nullable<Text>,
        /// Caller user agent.
        user_agent -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(orders -> users (user_id));
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> menu_items (menu_item_id));
diesel::joinable!(user_logs -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(menu_items, order_items, orders, user_logs, users);
