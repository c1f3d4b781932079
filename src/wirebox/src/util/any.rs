use std::any::Any;
use std::ops::Deref;

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

pub trait DowncastRef {
    fn is<T: Any>(&self) -> bool;

    fn downcast_ref<T: Any>(&self) -> Option<&T>;
}

impl<S> DowncastRef for S
where
    S: Deref<Target: AsAny>,
{
    #[inline]
    fn is<T: Any>(&self) -> bool {
        (**self).as_any().is::<T>()
    }

    #[inline]
    fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (**self).as_any().downcast_ref::<T>()
    }
}

pub trait Downcast: DowncastRef + Sized {
    type Output<T>;

    fn downcast<T: Any>(self) -> Result<Self::Output<T>, Self>;
}

impl<S> Downcast for Box<S>
where
    S: AsAny + ?Sized,
{
    type Output<T> = Box<T>;

    fn downcast<T: Any>(self) -> Result<Self::Output<T>, Self> {
        if self.is::<T>() {
            let res = self
                .into_any()
                .downcast::<T>()
                .unwrap_or_else(|_| std::unreachable!("`self` should be `Box<T>`"));
            Ok(res)
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Service: AsAny + Send + Sync {}

    impl Service for String {}

    #[test]
    fn downcast_ref_succeeds_when_receiver_is_a_box() {
        let service: Box<dyn Service> = Box::new(String::from("mailer"));

        assert!(service.is::<String>());
        assert!(!service.is::<i32>());
        assert_eq!(
            service.downcast_ref::<String>().map(String::as_str),
            Some("mailer")
        );
    }

    #[test]
    fn downcast_succeeds_when_type_matches() {
        let service: Box<dyn Service> = Box::new(String::from("mailer"));

        let service = service.downcast::<i32>().unwrap_err();
        let service = service.downcast::<String>().ok();
        assert_eq!(service.as_deref().map(String::as_str), Some("mailer"));
    }
}
