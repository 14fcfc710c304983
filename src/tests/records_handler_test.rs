#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use crate::models::meeting::Meeting;
    use crate::models::project::Project;
    use crate::models::task::Task;
    use crate::models::user::{PublicUser, Role};
    use crate::tests::{bearer, seed_user, setup_db};

    #[actix_rt::test]
    async fn test_supervisors() {
        let pool = setup_db().await;
        let (student, student_token) = seed_user(&pool, "student", Role::Student).await;
        let (supervisor, _) = seed_user(&pool, "supervisor", Role::Supervisor).await;
        let (_, admin_token) = seed_user(&pool, "admin", Role::Admin).await;
        let app = test_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/supervisors")
            .insert_header(bearer(&student_token))
            .to_request();
        let supervisors: Vec<PublicUser> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(supervisors.len(), 1);
        assert_eq!(supervisors[0].id, supervisor.id);

        let req = test::TestRequest::get()
            .uri(&format!("/api/supervisors/{}", student.id))
            .insert_header(bearer(&student_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let new_supervisor = json!({ "username": "dr_new", "password": "pw", "fullName": "Dr New" });
        let req = test::TestRequest::post()
            .uri("/api/supervisors")
            .insert_header(bearer(&student_token))
            .set_json(&new_supervisor)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/supervisors")
            .insert_header(bearer(&admin_token))
            .set_json(&new_supervisor)
            .to_request();
        let created: PublicUser = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.role, Role::Supervisor);

        let req = test::TestRequest::get()
            .uri(&format!("/api/supervisors/{}", created.id))
            .insert_header(bearer(&student_token))
            .to_request();
        let fetched: PublicUser = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched.profile.full_name, "Dr New");
    }

    #[actix_rt::test]
    async fn test_meetings_and_tasks() {
        let pool = setup_db().await;
        let (_, student_token) = seed_user(&pool, "student", Role::Student).await;
        let (_, outsider_token) = seed_user(&pool, "outsider", Role::Student).await;
        let (supervisor, supervisor_token) = seed_user(&pool, "supervisor", Role::Supervisor).await;
        let (_, other_supervisor_token) = seed_user(&pool, "other", Role::Supervisor).await;
        let app = test_app!(pool);

        let req = test::TestRequest::post()
            .uri("/api/projects")
            .insert_header(bearer(&student_token))
            .set_json(json!({
                "projectTitle": "test_project",
                "projectType": "Frontend",
                "program": "BSSE",
                "supervisor": supervisor.id,
            }))
            .to_request();
        let project: Project = test::call_and_read_body_json(&app, req).await;
        assert!(project.group_members.is_empty());

        let meeting = json!({
            "project": project.id,
            "scheduledAt": "2026-11-02T10:00:00Z",
            "agenda": "proposal review",
        });
        for (token, status) in [
            (&student_token, StatusCode::FORBIDDEN),
            (&other_supervisor_token, StatusCode::FORBIDDEN),
            (&supervisor_token, StatusCode::CREATED),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/meetings")
                .insert_header(bearer(token))
                .set_json(&meeting)
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), status);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/meetings/project/{}", project.id))
            .insert_header(bearer(&student_token))
            .to_request();
        let meetings: Vec<Meeting> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].agenda, "proposal review");
        assert_eq!(meetings[0].scheduled_by, supervisor.id);

        let req = test::TestRequest::get()
            .uri(&format!("/api/meetings/project/{}", project.id))
            .insert_header(bearer(&outsider_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&supervisor_token))
            .set_json(json!({ "project": project.id, "title": "draft chapter 1" }))
            .to_request();
        let task: Task = test::call_and_read_body_json(&app, req).await;
        assert!(!task.completed);

        let complete = format!("/api/tasks/{}/complete", task.id);
        let req = test::TestRequest::put()
            .uri(&complete)
            .insert_header(bearer(&outsider_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&complete)
            .insert_header(bearer(&student_token))
            .to_request();
        let done: Task = test::call_and_read_body_json(&app, req).await;
        assert!(done.completed);

        let req = test::TestRequest::get()
            .uri(&format!("/api/tasks/project/{}", project.id))
            .insert_header(bearer(&supervisor_token))
            .to_request();
        let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tasks, vec![done]);

        let req = test::TestRequest::put()
            .uri("/api/tasks/999/complete")
            .insert_header(bearer(&student_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
