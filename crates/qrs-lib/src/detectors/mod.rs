pub mod ecg;
pub mod fiducial;
pub mod peaks;
pub mod transform;
