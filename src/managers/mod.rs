pub mod deployments;
