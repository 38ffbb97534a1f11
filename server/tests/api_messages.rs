//! Integration tests per gli endpoints della posta interna
//!
//! Test per:
//! - POST /api/messages (routing, validazione, risposte)
//! - GET /api/messages/inbox e /sent
//! - GET /api/messages/{id} (thread e stato di lettura)
//! - GET /api/messages/recipients (solo admin)
//! - Middleware di autenticazione
//!
//! Lo stato usa gli store in memoria, non serve un database.

mod common;

#[cfg(test)]
mod message_tests {
    use super::common::*;
    use axum_test::TestServer;
    use axum_test::http::HeaderName;
    use daycare_mail::dtos::{
        InboxItemDTO, RecipientDirectoryDTO, SendMessageResponseDTO, SentItemDTO, ThreadDTO,
    };
    use daycare_mail::entities::Role;
    use serde_json::{Value, json};

    fn authorization() -> HeaderName {
        HeaderName::from_static("authorization")
    }

    async fn send(server: &TestServer, auth: &str, body: Value) -> i32 {
        let response = server
            .post("/api/messages")
            .add_header(authorization(), auth.to_string())
            .json(&body)
            .await;
        response.assert_status_ok();
        let created: SendMessageResponseDTO = response.json();
        assert!(created.success);
        created.message_id
    }

    // ============================================================
    // Autenticazione
    // ============================================================

    #[tokio::test]
    async fn test_root_is_public() {
        let server = create_test_server(create_test_state());
        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_text("Server is running!");
    }

    #[tokio::test]
    async fn test_inbox_without_token() {
        let server = create_test_server(create_test_state());
        let response = server.get("/api/messages/inbox").await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_inbox_with_invalid_token() {
        let server = create_test_server(create_test_state());
        let token = create_test_jwt(PARENT, vec![Role::Parent], "another-secret");

        let response = server
            .get("/api/messages/inbox")
            .add_header(authorization(), format!("Bearer {}", token))
            .await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_inbox_for_unknown_user() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/api/messages/inbox")
            .add_header(authorization(), bearer("ghost-9", vec![Role::Parent]))
            .await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_token_in_query_string() {
        let server = create_test_server(create_test_state());
        let token = create_test_jwt(PARENT, vec![Role::Parent], JWT_SECRET);

        let response = server
            .get("/api/messages/inbox")
            .add_query_param("access_token", token)
            .await;
        response.assert_status_ok();
    }

    // ============================================================
    // POST /api/messages
    // ============================================================

    #[tokio::test]
    async fn test_parent_message_goes_to_admin() {
        let server = create_test_server(create_test_state());
        let parent = bearer(PARENT, vec![Role::Parent]);
        let admin = bearer(ADMIN, vec![Role::Admin]);

        let id = send(
            &server,
            &parent,
            json!({
                "subject": "Nap schedule",
                "content": "Can we move the nap?",
                "recipientType": "individual",
                "recipientId": TEACHER
            }),
        )
        .await;

        let sent: Vec<SentItemDTO> = server
            .get("/api/messages/sent")
            .add_header(authorization(), parent.clone())
            .await
            .json();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, id);
        assert_eq!(sent[0].recipient_id.as_deref(), Some(ADMIN));
        assert_eq!(sent[0].recipient_name, "Ada Admin");

        let inbox: Vec<InboxItemDTO> = server
            .get("/api/messages/inbox")
            .add_header(authorization(), admin)
            .await
            .json();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].sender_name, "Paula Parent");
        assert!(!inbox[0].is_read);
    }

    #[tokio::test]
    async fn test_recipient_type_defaults_to_individual() {
        let server = create_test_server(create_test_state());
        let parent = bearer(PARENT, vec![Role::Parent]);

        send(
            &server,
            &parent,
            json!({ "subject": "Hello", "content": "No type given" }),
        )
        .await;

        let inbox: Vec<Value> = server
            .get("/api/messages/inbox")
            .add_header(authorization(), bearer(ADMIN, vec![Role::Admin]))
            .await
            .json();
        assert_eq!(inbox[0]["recipientType"], "individual");
    }

    #[tokio::test]
    async fn test_parent_broadcast_is_forbidden() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/api/messages")
            .add_header(authorization(), bearer(PARENT, vec![Role::Parent]))
            .json(&json!({
                "subject": "Party",
                "content": "Everyone is invited",
                "recipientType": "all"
            }))
            .await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_admin_individual_requires_recipient() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/api/messages")
            .add_header(authorization(), bearer(ADMIN, vec![Role::Admin]))
            .json(&json!({
                "subject": "Hello",
                "content": "Who am I writing to?",
                "recipientType": "individual"
            }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "RecipientId required for individual messages");
    }

    #[tokio::test]
    async fn test_missing_subject_is_bad_request() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/api/messages")
            .add_header(authorization(), bearer(ADMIN, vec![Role::Admin]))
            .json(&json!({ "content": "No subject", "recipientId": PARENT }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Subject and Content are required");
    }

    #[tokio::test]
    async fn test_broadcast_shows_all_users() {
        let server = create_test_server(create_test_state());
        let admin = bearer(ADMIN, vec![Role::Admin]);

        let id = send(
            &server,
            &admin,
            json!({
                "subject": "Closed Monday",
                "content": "The daycare is closed next Monday",
                "recipientType": "all",
                "recipientId": PARENT
            }),
        )
        .await;

        let sent: Vec<SentItemDTO> = server
            .get("/api/messages/sent")
            .add_header(authorization(), admin)
            .await
            .json();
        assert_eq!(sent[0].recipient_name, "All Users");
        assert_eq!(sent[0].recipient_id, None);

        for viewer in [OTHER_PARENT, TEACHER] {
            let inbox: Vec<InboxItemDTO> = server
                .get("/api/messages/inbox")
                .add_header(authorization(), bearer(viewer, vec![]))
                .await
                .json();
            assert_eq!(inbox.len(), 1);
            assert_eq!(inbox[0].id, id);
        }

        let thread: ThreadDTO = server
            .get(&format!("/api/messages/{id}"))
            .add_header(authorization(), bearer(PARENT, vec![Role::Parent]))
            .await
            .json();
        assert_eq!(thread.recipient_name, "All Users");
        assert!(!thread.is_read);
    }

    // ============================================================
    // GET /api/messages/{id}
    // ============================================================

    #[tokio::test]
    async fn test_thread_replies_and_read_state() {
        let server = create_test_server(create_test_state());
        let admin = bearer(ADMIN, vec![Role::Admin]);
        let parent = bearer(PARENT, vec![Role::Parent]);

        let root = send(
            &server,
            &admin,
            json!({
                "subject": "Pickup",
                "content": "Pickup moves to 4pm",
                "recipientId": PARENT
            }),
        )
        .await;
        let first = send(
            &server,
            &parent,
            json!({ "subject": "Re: Pickup", "content": "Noted", "parentMessageId": root }),
        )
        .await;
        let second = send(
            &server,
            &admin,
            json!({
                "subject": "Re: Pickup",
                "content": "Thanks",
                "recipientId": PARENT,
                "parentMessageId": root
            }),
        )
        .await;

        let inbox: Vec<InboxItemDTO> = server
            .get("/api/messages/inbox")
            .add_header(authorization(), parent.clone())
            .await
            .json();
        assert_eq!(inbox.len(), 1, "Replies must not show up as roots");
        assert_eq!(inbox[0].reply_count, 2);
        assert!(!inbox[0].is_read);

        let response = server
            .get(&format!("/api/messages/{root}"))
            .add_header(authorization(), parent.clone())
            .await;
        response.assert_status_ok();
        let thread: ThreadDTO = response.json();
        assert!(thread.is_read);
        let ids: Vec<i32> = thread.replies.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(thread.replies[1].sender_name, "Ada Admin");

        let inbox: Vec<InboxItemDTO> = server
            .get("/api/messages/inbox")
            .add_header(authorization(), parent)
            .await
            .json();
        assert!(inbox[0].is_read);
    }

    #[tokio::test]
    async fn test_thread_not_found() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/api/messages/999")
            .add_header(authorization(), bearer(ADMIN, vec![Role::Admin]))
            .await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_reply_to_reply_is_bad_request() {
        let server = create_test_server(create_test_state());
        let admin = bearer(ADMIN, vec![Role::Admin]);
        let parent = bearer(PARENT, vec![Role::Parent]);

        let root = send(
            &server,
            &admin,
            json!({ "subject": "Pickup", "content": "4pm", "recipientId": PARENT }),
        )
        .await;
        let child = send(
            &server,
            &parent,
            json!({ "subject": "Re", "content": "Ok", "parentMessageId": root }),
        )
        .await;

        let response = server
            .post("/api/messages")
            .add_header(authorization(), admin)
            .json(&json!({
                "subject": "Re: Re",
                "content": "Nested",
                "recipientId": PARENT,
                "parentMessageId": child
            }))
            .await;
        response.assert_status_bad_request();
    }

    // ============================================================
    // GET /api/messages/recipients
    // ============================================================

    #[tokio::test]
    async fn test_recipients_for_admin() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/api/messages/recipients")
            .add_header(authorization(), bearer(ADMIN, vec![Role::Admin]))
            .await;
        response.assert_status_ok();
        let directory: RecipientDirectoryDTO = response.json();
        assert_eq!(directory.parents.len(), 2);
        assert_eq!(directory.parents[0].name, "Paula Parent");
        assert_eq!(directory.teachers.len(), 1);
    }

    #[tokio::test]
    async fn test_recipients_forbidden_for_teacher() {
        let server = create_test_server(create_test_state());

        let response = server
            .get("/api/messages/recipients")
            .add_header(authorization(), bearer(TEACHER, vec![Role::Teacher]))
            .await;
        response.assert_status_forbidden();
    }
}
