diesel::table! {
    technicians (id) {
        id -> Integer,
        login -> Text,
        credential_hash -> Text,
        display_name -> Text,
    }
}

diesel::table! {
    clients (national_id) {
        national_id -> Text,
        name -> Text,
        install_address -> Text,
        phone -> Text,
    }
}

diesel::table! {
    tickets (id) {
        id -> Integer,
        ticket_number -> Integer,
        status -> Text,
        reason -> Nullable<Text>,
        description -> Nullable<Text>,
        created_at -> Timestamp,
        started_at -> Nullable<Timestamp>,
        closed_at -> Nullable<Timestamp>,
        edited_at -> Nullable<Timestamp>,
        technician_id -> Integer,
        client_id -> Nullable<Text>,
    }
}

diesel::table! {
    images (id) {
        id -> Integer,
        ticket_id -> Integer,
        payload -> Binary,
        filename -> Text,
        media_type -> Text,
        byte_size -> BigInt,
        caption -> Nullable<Text>,
        uploaded_at -> Timestamp,
    }
}

diesel::table! {
    positions (id) {
        id -> Integer,
        technician_id -> Integer,
        ticket_id -> Integer,
        latitude -> Double,
        longitude -> Double,
        recorded_at -> Timestamp,
    }
}

diesel::table! {
    audit_entries (id) {
        id -> Integer,
        ticket_id -> Integer,
        technician_id -> Integer,
        action -> Text,
        detail -> Text,
        recorded_at -> Timestamp,
    }
}

diesel::joinable!(tickets -> technicians (technician_id));
diesel::joinable!(images -> tickets (ticket_id));
diesel::joinable!(positions -> tickets (ticket_id));
diesel::joinable!(audit_entries -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(
    technicians,
    clients,
    tickets,
    images,
    positions,
    audit_entries,
);
