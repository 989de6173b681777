use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use ::common::{NotificationPayload, Task};
use inventory_server::entity::part_file;

use crate::common::{QUEUE_NAME, TestApp, routes};

async fn file_count(app: &TestApp) -> u64 {
    part_file::Entity::find().count(&app.db).await.unwrap()
}

mod upload_form {
    use super::*;

    #[tokio::test]
    async fn get_returns_empty_form() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::upload(1, 1)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({"file_name": "", "content": ""}));
    }
}

mod upload_file {
    use super::*;

    #[tokio::test]
    async fn stores_file_and_enqueues_one_notification() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;
        let before = file_count(&app).await;

        let res = app
            .upload(car, part, "brake.txt", "Brake pad specification")
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "File uploaded successfully.");
        let file_id = res.body["file_id"].as_i64().unwrap() as i32;
        assert_eq!(file_count(&app).await, before + 1);

        let stored = part_file::Entity::find_by_id(file_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.part_id, part);
        assert_eq!(stored.file, "part_files/brake.txt");

        let published = app.queue.published();
        assert_eq!(published.len(), 1);
        let (queue_name, task): (String, Task) = published.into_iter().next().unwrap();
        assert_eq!(queue_name, QUEUE_NAME);
        assert_eq!(task.task_type, "send_email");

        let payload: NotificationPayload = task.into_message().unwrap();
        assert_eq!(payload.automobile.manufacturer, "Toyota");
        assert_eq!(payload.automobile.model, "Corolla");
        assert_eq!(payload.automobile.automobile_type, "Sedan");
        assert_eq!(payload.part.name, "Brakes");
        assert_eq!(
            payload.part.file_link,
            app.url("/media/part_files/brake.txt")
        );
    }

    #[tokio::test]
    async fn file_link_serves_uploaded_content() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;
        app.upload_ok(car, part, "brake.txt", "pads").await;

        let (_, task) = app.queue.published().into_iter().next().unwrap();
        let payload: NotificationPayload = task.into_message().unwrap();
        let res = app.get_absolute(&payload.part.file_link).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.text, "pads");
    }

    #[tokio::test]
    async fn values_are_trimmed_before_storing() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let file_id = app
            .upload_ok(car, part, "  notes.txt  ", "\n  hello \n")
            .await;

        let stored = part_file::Entity::find_by_id(file_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.file, "part_files/notes.txt");
        let res = app.get(&routes::download(part, file_id)).await;
        assert_eq!(res.bytes, b"hello");
    }

    #[tokio::test]
    async fn unsafe_names_are_cleaned() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let file_id = app
            .upload_ok(car, part, "../../etc/my brake; notes.txt", "x")
            .await;

        let stored = part_file::Entity::find_by_id(file_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.file, "part_files/my_brake_notes.txt");
    }

    #[tokio::test]
    async fn repeated_names_get_distinct_storage_paths() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let first = app.upload_ok(car, part, "manual.txt", "one").await;
        let second = app.upload_ok(car, part, "manual.txt", "two").await;

        let a = part_file::Entity::find_by_id(first)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let b = part_file::Entity::find_by_id(second)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.file, "part_files/manual.txt");
        assert_ne!(a.file, b.file);
        assert!(b.file.starts_with("part_files/manual_"));

        assert_eq!(app.get(&routes::download(part, first)).await.text, "one");
        assert_eq!(app.get(&routes::download(part, second)).await.text, "two");
    }

    #[tokio::test]
    async fn blank_file_name_is_rejected_without_side_effects() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let res = app.upload(car, part, "", "content").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(
            res.body["fields"]["file_name"],
            json!(["This field may not be blank."])
        );
        assert_eq!(file_count(&app).await, 0);
        assert!(app.queue.published().is_empty());
    }

    #[tokio::test]
    async fn missing_content_is_rejected() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let res = app
            .post(&routes::upload(car, part), &json!({"file_name": "a.txt"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["fields"]["content"],
            json!(["This field is required."])
        );
        assert!(res.body["fields"].get("file_name").is_none());
        assert_eq!(file_count(&app).await, 0);
    }

    #[tokio::test]
    async fn null_content_is_not_treated_as_missing() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let res = app
            .post(
                &routes::upload(car, part),
                &json!({"file_name": "a.txt", "content": null}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(
            res.body["fields"]["content"],
            json!(["This field may not be null."])
        );
        assert_eq!(file_count(&app).await, 0);
        assert!(app.queue.published().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_ids_are_validation_errors() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                "/automobiles/1/parts/brakes/upload/",
                &json!({"file_name": "a.txt", "content": "x"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(file_count(&app).await, 0);
    }

    #[tokio::test]
    async fn whitespace_only_values_are_blank() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let res = app.upload(car, part, "   ", "   ").await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["fields"]["file_name"],
            json!(["This field may not be blank."])
        );
        assert_eq!(
            res.body["fields"]["content"],
            json!(["This field may not be blank."])
        );
    }

    #[tokio::test]
    async fn name_without_usable_characters_is_rejected() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let res = app.upload(car, part, "???", "content").await;

        assert_eq!(res.status, 400);
        assert!(res.body["fields"]["file_name"].is_array());
        assert_eq!(file_count(&app).await, 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;

        let res = app
            .client
            .post(app.url(&routes::upload(car, part)))
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn oversized_content_is_rejected() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;
        let content = "x".repeat(1024 * 1024 + 1);

        let res = app.upload(car, part, "big.txt", &content).await;

        assert_eq!(res.status, 400);
        assert_eq!(file_count(&app).await, 0);
        assert!(app.queue.published().is_empty());
    }

    #[tokio::test]
    async fn part_of_another_automobile_is_not_found() {
        let app = TestApp::spawn().await;
        let corolla = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let civic = app.create_automobile("Honda", "Civic", "Hatchback").await;
        let part = app.create_part(civic, "Exhaust").await;

        let res = app.upload(corolla, part, "a.txt", "x").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(file_count(&app).await, 0);
    }

    #[tokio::test]
    async fn missing_part_is_checked_before_the_body() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;

        let res = app.upload(car, 9999, "", "").await;

        assert_eq!(res.status, 404);
    }
}
