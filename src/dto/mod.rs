pub mod project_dto;
