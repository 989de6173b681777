use sea_orm::{EntityTrait, PaginatorTrait};

use inventory_server::entity::{automobile, part, part_file};

use crate::common::{TestApp, routes};

mod list_automobiles {
    use super::*;

    #[tokio::test]
    async fn empty_database_lists_nothing() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::AUTOMOBILES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn nests_parts_and_files_in_id_order() {
        let app = TestApp::spawn().await;
        let corolla = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let civic = app.create_automobile("Honda", "Civic", "Hatchback").await;
        let brakes = app.create_part(corolla, "Brakes").await;
        let _mirror = app.create_part(corolla, "Mirror").await;
        let file_id = app
            .attach_file(brakes, "part_files", "brake.txt", b"pads")
            .await;

        let res = app.get(routes::AUTOMOBILES).await;

        assert_eq!(res.status, 200);
        let list = res.body.as_array().unwrap();
        assert_eq!(list.len(), 2);

        assert_eq!(list[0]["id"], corolla);
        assert_eq!(list[0]["manufacturer"], "Toyota");
        assert_eq!(list[0]["type"], "Sedan");
        assert_eq!(list[0]["model"], "Corolla");
        let parts = list[0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["name"], "Brakes");
        assert_eq!(parts[1]["name"], "Mirror");
        assert_eq!(parts[1]["files"], serde_json::json!([]));
        assert_eq!(parts[0]["files"][0]["id"], file_id);
        assert_eq!(
            parts[0]["files"][0]["file"],
            app.url("/media/part_files/brake.txt")
        );

        assert_eq!(list[1]["id"], civic);
        assert_eq!(list[1]["parts"], serde_json::json!([]));
    }
}

mod get_automobile {
    use super::*;

    #[tokio::test]
    async fn returns_one_automobile_with_parts() {
        let app = TestApp::spawn().await;
        let id = app.create_automobile("Ford", "Focus", "Sedan").await;
        app.create_part(id, "Clutch").await;

        let res = app.get(&routes::automobile(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["manufacturer"], "Ford");
        assert_eq!(res.body["parts"][0]["name"], "Clutch");
    }

    #[tokio::test]
    async fn missing_automobile_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::automobile(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get("/automobiles/abc").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].is_string());
    }
}

mod list_parts {
    use super::*;

    #[tokio::test]
    async fn returns_only_parts_of_that_automobile() {
        let app = TestApp::spawn().await;
        let corolla = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let civic = app.create_automobile("Honda", "Civic", "Hatchback").await;
        let brakes = app.create_part(corolla, "Brakes").await;
        let wheel = app.create_part(corolla, "Wheel").await;
        app.create_part(civic, "Exhaust").await;

        let res = app.get(&routes::parts(corolla)).await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![brakes as i64, wheel as i64]);
    }

    #[tokio::test]
    async fn duplicate_part_names_are_listed_separately() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        app.create_part(car, "Filter").await;
        app.create_part(car, "Filter").await;

        let res = app.get(&routes::parts(car)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn automobile_without_parts_gives_empty_list() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Kia", "Rio", "Sedan").await;

        let res = app.get(&routes::parts(car)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn missing_automobile_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::parts(42)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn file_urls_follow_the_request_host() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let part = app.create_part(car, "Brakes").await;
        app.attach_file(part, "part_files", "brake.txt", b"pads")
            .await;

        let res = app
            .client
            .get(app.url(&routes::parts(car)))
            .header("Host", "inventory.example.com")
            .header("X-Forwarded-Proto", "https")
            .send()
            .await
            .unwrap();
        let body: serde_json::Value = res.json().await.unwrap();

        assert_eq!(
            body[0]["files"][0]["file"],
            "https://inventory.example.com/media/part_files/brake.txt"
        );
    }
}

mod cascade {
    use super::*;

    #[tokio::test]
    async fn deleting_an_automobile_removes_parts_and_files() {
        let app = TestApp::spawn().await;
        let car = app.create_automobile("Toyota", "Corolla", "Sedan").await;
        let other = app.create_automobile("Honda", "Civic", "Hatchback").await;
        let brakes = app.create_part(car, "Brakes").await;
        let exhaust = app.create_part(other, "Exhaust").await;
        app.attach_file(brakes, "part_files", "a.txt", b"a").await;
        app.attach_file(exhaust, "part_files", "b.txt", b"b").await;

        automobile::Entity::delete_by_id(car)
            .exec(&app.db)
            .await
            .unwrap();

        assert_eq!(part::Entity::find().count(&app.db).await.unwrap(), 1);
        assert_eq!(part_file::Entity::find().count(&app.db).await.unwrap(), 1);
        assert_eq!(app.get(&routes::parts(car)).await.status, 404);
    }
}

mod api_docs {
    use super::*;

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let app = TestApp::spawn().await;

        let res = app.get("/api-docs/openapi.json").await;

        assert_eq!(res.status, 200);
        let paths = res.body["paths"].as_object().unwrap();
        assert!(paths.contains_key("/automobiles/"));
        assert!(paths.contains_key("/automobiles/{automobile_id}/parts/{part_id}/upload/"));
        assert!(paths.contains_key("/parts/{part_id}/download_all/"));
    }
}
