//! Clamping threat ranges into the scan bounds

use super::volume::Point3;

/// Clamp the threat range `[t_min, t_max]` into `[r_min, r_max]`.
///
/// `t_min` is settled before `t_max` is looked at, and each end may be pulled
/// to either bound. A range lying entirely past one bound collapses onto it.
pub fn clip_threat_range<T>(r_min: T, r_max: T, t_min: &mut T, t_max: &mut T)
where
    T: PartialOrd + Copy,
{
    if *t_min < r_min {
        *t_min = r_min;
    }
    if *t_min > r_max {
        *t_min = r_max;
    }
    if *t_max > r_max {
        *t_max = r_max;
    }
    if *t_max < r_min {
        *t_max = r_min;
    }
}

/// Clip the threat box `[p0, p1]` into `[p_min, p_max]`, one axis at a time
pub fn clip_volume_range(p_min: &Point3, p_max: &Point3, p0: &mut Point3, p1: &mut Point3) {
    clip_threat_range(p_min.x, p_max.x, &mut p0.x, &mut p1.x);
    clip_threat_range(p_min.y, p_max.y, &mut p0.y, &mut p1.y);
    clip_threat_range(p_min.z, p_max.z, &mut p0.z, &mut p1.z);
}
