//! Diesel schema for marketplace persistence.

diesel::table! {
    /// Customer and service-provider profiles.
    profiles (id) {
        /// Profile identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        full_name -> Varchar,
        /// Unique contact email.
        #[max_length = 255]
        email -> Varchar,
        /// Marketplace role.
        #[max_length = 32]
        role -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks posted by customers.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task category.
        #[max_length = 100]
        category -> Varchar,
        /// Short title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Budget in cents.
        budget_cents -> Int8,
        /// Where the work happens.
        #[max_length = 255]
        location -> Varchar,
        /// Requested date.
        scheduled_for -> Date,
        /// Creating customer.
        created_by -> Uuid,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Provider whose offer was accepted.
        accepted_provider_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Provider bids on tasks.
    offers (id) {
        /// Offer identifier.
        id -> Uuid,
        /// Parent task.
        task_id -> Uuid,
        /// Bidding provider.
        provider_id -> Uuid,
        /// Offered price in cents.
        price_cents -> Int8,
        /// Note from the provider.
        message -> Text,
        /// Resolution status.
        #[max_length = 32]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One chat per offer.
    chats (id) {
        /// Chat identifier.
        id -> Uuid,
        /// Parent task.
        task_id -> Uuid,
        /// Customer participant.
        customer_id -> Uuid,
        /// Provider participant.
        provider_id -> Uuid,
        /// Originating offer.
        offer_id -> Uuid,
        /// Whether the chat accepts user messages.
        active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Timestamp of the latest activity.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only chat messages.
    chat_messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Parent chat.
        chat_id -> Uuid,
        /// Sending profile.
        sender_id -> Uuid,
        /// Message text.
        body -> Text,
        /// Message kind.
        #[max_length = 32]
        kind -> Varchar,
        /// Whether the recipient has read the message.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(offers -> tasks (task_id));
diesel::joinable!(chats -> offers (offer_id));
diesel::joinable!(chat_messages -> chats (chat_id));

diesel::allow_tables_to_appear_in_same_query!(profiles, tasks, offers, chats, chat_messages);
