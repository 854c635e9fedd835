use super::{CyCxHW, Rect, TLBR};
use crate::common::*;

/// An axis-aligned scale-and-translate mapping applied to boxes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sy: T,
    pub sx: T,
    pub ty: T,
    pub tx: T,
}

impl<T> Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    /// The mapping that takes `src` onto `tgt`.
    pub fn from_rects<R>(src: &R, tgt: &R) -> Self
    where
        R: Rect<Type = T>,
    {
        let sy = tgt.h() / src.h();
        let sx = tgt.w() / src.w();
        let ty = tgt.t() - src.t() * sy;
        let tx = tgt.l() - src.l() * sx;

        Self { sy, sx, ty, tx }
    }

    /// Uniform scale followed by a uniform translation on both axes.
    pub fn scale_offset(scale: T, offset: T) -> Self {
        Self {
            sy: scale,
            sx: scale,
            ty: offset,
            tx: offset,
        }
    }
}

impl<T> Transform<T> {
    pub fn try_cast<V>(self) -> Option<Transform<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(Transform {
            sy: V::from(self.sy)?,
            sx: V::from(self.sx)?,
            ty: V::from(self.ty)?,
            tx: V::from(self.tx)?,
        })
    }

    pub fn cast<V>(self) -> Transform<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Mul<&TLBR<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = TLBR<T>;

    fn mul(self, rhs: &TLBR<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&CyCxHW<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = CyCxHW<T>;

    fn mul(self, rhs: &CyCxHW<T>) -> Self::Output {
        rhs.transform(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectExt;

    #[test]
    fn transform_from_rects() {
        let src = TLBR::from_tlhw([0.0, 0.0, 80.0, 80.0]);
        let tgt = TLBR::from_tlhw([0.0, 0.0, 20.0, 40.0]);
        let transform = Transform::from_rects(&src, &tgt);
        let expect = Transform {
            sy: 0.25,
            sx: 0.5,
            ty: 0.0,
            tx: 0.0,
        };
        assert_eq!(transform, expect);
    }

    #[test]
    fn scale_offset_places_unit_box() {
        // a unit-space box scaled to 128 px and shifted one tile right/down
        let transform = Transform::scale_offset(128.0, 128.0);
        let rect = TLBR::from_tlbr([0.0, 0.0, 1.0, 1.0]);
        let mapped = &transform * &rect;
        assert_eq!(mapped.tlbr(), [128.0, 128.0, 256.0, 256.0]);
    }
}
