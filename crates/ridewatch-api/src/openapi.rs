//! OpenAPI document served at `/openapi.json` and rendered at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ridewatch API",
        description = "Lost vehicle reports matched against camera sightings"
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::login,
        handlers::auth::admin_login,
        handlers::users::register_user,
        handlers::users::get_me,
        handlers::users::get_user,
        handlers::users::list_users,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::admins::create_admin,
        handlers::admins::list_admins,
        handlers::vehicles::list_vehicles,
        handlers::vehicles::create_vehicle,
        handlers::vehicles::get_vehicle,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,
        handlers::cameras::list_cameras,
        handlers::cameras::create_camera,
        handlers::cameras::get_camera,
        handlers::cameras::update_camera,
        handlers::cameras::delete_camera,
        handlers::detections::list_detections,
        handlers::detections::create_detection,
        handlers::detections::get_detection,
        handlers::detections::delete_detection,
        handlers::suspects::list_suspects,
        handlers::suspects::create_suspect,
        handlers::suspects::get_suspect,
        handlers::suspects::delete_suspect,
        handlers::images::upload_image,
        handlers::images::get_image,
        handlers::lost_reports::list_lost_reports,
        handlers::lost_reports::create_lost_report,
        handlers::lost_reports::get_lost_report,
        handlers::lost_reports::update_lost_report,
        handlers::lost_reports::delete_lost_report,
        handlers::lost_reports::get_lost_report_result,
    ),
    components(schemas(
        handlers::auth::LoginRequest,
        handlers::auth::TokenResponse,
        handlers::users::RegisterUserRequest,
        handlers::admins::RegisterAdminRequest,
        handlers::images::UploadImageForm,
        ridewatch_core::User,
        ridewatch_core::Admin,
        ridewatch_core::UpdateUserRequest,
        ridewatch_core::Vehicle,
        ridewatch_core::CreateVehicleRequest,
        ridewatch_core::UpdateVehicleRequest,
        ridewatch_core::Camera,
        ridewatch_core::CreateCameraRequest,
        ridewatch_core::UpdateCameraRequest,
        ridewatch_core::Image,
        ridewatch_core::ImageKind,
        ridewatch_core::Detected,
        ridewatch_core::CreateDetectedRequest,
        ridewatch_core::LostReport,
        ridewatch_core::LostStatus,
        ridewatch_core::CreateLostReportRequest,
        ridewatch_core::ReportUpdate,
        ridewatch_core::Suspect,
        ridewatch_core::CreateSuspectRequest,
        ridewatch_core::ResultView,
        ridewatch_core::SuspectInfo,
        ridewatch_core::CameraInfo,
        ridewatch_core::AnalysisStatus,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "Users", description = "User accounts"),
        (name = "Admins", description = "Operator accounts"),
        (name = "Vehicles", description = "Registered vehicles"),
        (name = "Cameras", description = "Camera registry"),
        (name = "Detections", description = "Camera sightings"),
        (name = "Suspects", description = "Scored matches"),
        (name = "Images", description = "Image upload"),
        (name = "Lost Reports", description = "Lost vehicle reports and results"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` JWT scheme referenced by secured paths.
pub struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_core_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/lost-reports/{id}"));
        assert!(paths.contains_key("/api/lost-reports/{id}/result"));
        assert!(paths.contains_key("/api/auth/login"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
