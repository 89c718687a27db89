use crate::models::{Point, ShotEvent};

/// Split an ordered match log into points.
///
/// Every event carrying a serve marker opens a new point; the events that follow
/// it, up to the next marker, are that point's rally. Events logged before the
/// first marker have no point to belong to and are dropped.
pub fn segment_points<I>(events: I) -> Vec<Point>
where
    I: IntoIterator<Item = ShotEvent>,
{
    let mut points = Vec::new();
    let mut current: Option<Point> = None;
    let mut discarded = 0usize;

    for event in events {
        if event.serve.is_some() {
            if let Some(point) = current.take() {
                points.push(point);
            }
            current = Some(Point::open(event));
        } else if let Some(point) = current.as_mut() {
            point.push(event);
        } else {
            discarded += 1;
        }
    }

    if let Some(point) = current {
        points.push(point);
    }

    if discarded > 0 {
        tracing::debug!("Discarded {} events logged before the first serve", discarded);
    }
    tracing::debug!("Segmented match log into {} points", points.len());

    points
}
