//! Derivative-free scalar minimization.
//!
//! `bracket` walks downhill from two starting points until it encloses a
//! minimum, and `brent` then refines it with Brent's method (parabolic
//! interpolation with golden-section fallback). Used to fit the Yeo-Johnson
//! exponent by maximum likelihood.

const GOLDEN: f64 = 1.618_034;
const CGOLD: f64 = 0.381_966_0;
const VERY_SMALL: f64 = 1e-21;
const GROW_LIMIT: f64 = 110.0;
const BRACKET_MAX_ITER: usize = 1000;
const BRENT_MAX_ITER: usize = 500;
const BRENT_TOL: f64 = 1.48e-8;
const BRENT_MIN_TOL: f64 = 1.0e-11;

/// Three abscissae `a`, `b`, `c` with `f(b)` not above `f(a)` or `f(c)`.
#[derive(Debug, Clone, Copy)]
pub struct Bracket {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub fa: f64,
    pub fb: f64,
    pub fc: f64,
}

/// Search downhill from `(xa, xb)` for a bracketing triple.
///
/// Returns the last triple examined if the search runs out of iterations;
/// `brent` still converges to a local minimum inside it.
pub fn bracket<F>(f: &F, xa: f64, xb: f64) -> Bracket
where
    F: Fn(f64) -> f64,
{
    let (mut xa, mut xb) = (xa, xb);
    let (mut fa, mut fb) = (f(xa), f(xb));
    if fa < fb {
        std::mem::swap(&mut xa, &mut xb);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut xc = xb + GOLDEN * (xb - xa);
    let mut fc = f(xc);

    let mut iter = 0;
    while fc < fb {
        let tmp1 = (xb - xa) * (fb - fc);
        let tmp2 = (xb - xc) * (fb - fa);
        let val = tmp2 - tmp1;
        let denom = if val.abs() < VERY_SMALL {
            2.0 * VERY_SMALL
        } else {
            2.0 * val
        };
        let mut w = xb - ((xb - xc) * tmp2 - (xb - xa) * tmp1) / denom;
        let wlim = xb + GROW_LIMIT * (xc - xb);
        if iter > BRACKET_MAX_ITER {
            log::debug!("bracket search stopped after {} iterations", iter);
            break;
        }
        iter += 1;

        let mut fw;
        if (w - xc) * (xb - w) > 0.0 {
            fw = f(w);
            if fw < fc {
                xa = xb;
                xb = w;
                fa = fb;
                fb = fw;
                break;
            } else if fw > fb {
                xc = w;
                fc = fw;
                break;
            }
            w = xc + GOLDEN * (xc - xb);
            fw = f(w);
        } else if (w - wlim) * (wlim - xc) >= 0.0 {
            w = wlim;
            fw = f(w);
        } else if (w - wlim) * (xc - w) > 0.0 {
            fw = f(w);
            if fw < fc {
                xb = xc;
                xc = w;
                w = xc + GOLDEN * (xc - xb);
                fb = fc;
                fc = fw;
                fw = f(w);
            }
        } else {
            w = xc + GOLDEN * (xc - xb);
            fw = f(w);
        }
        xa = xb;
        xb = xc;
        xc = w;
        fa = fb;
        fb = fc;
        fc = fw;
    }

    Bracket {
        a: xa,
        b: xb,
        c: xc,
        fa,
        fb,
        fc,
    }
}

/// Minimize `f` starting from the bracket found from `(xa, xb)`.
pub fn brent<F>(f: F, xa: f64, xb: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let br = bracket(&f, xa, xb);

    let (mut a, mut b) = if br.a < br.c { (br.a, br.c) } else { (br.c, br.a) };
    let (mut x, mut w, mut v) = (br.b, br.b, br.b);
    let (mut fx, mut fw, mut fv) = (br.fb, br.fb, br.fb);
    let mut deltax: f64 = 0.0;
    let mut rat: f64 = 0.0;

    for _ in 0..BRENT_MAX_ITER {
        let tol1 = BRENT_TOL * x.abs() + BRENT_MIN_TOL;
        let tol2 = 2.0 * tol1;
        let xmid = 0.5 * (a + b);
        if (x - xmid).abs() < (tol2 - 0.5 * (b - a)) {
            break;
        }

        if deltax.abs() <= tol1 {
            deltax = if x >= xmid { a - x } else { b - x };
            rat = CGOLD * deltax;
        } else {
            // parabolic step
            let tmp1 = (x - w) * (fx - fv);
            let mut tmp2 = (x - v) * (fx - fw);
            let mut p = (x - v) * tmp2 - (x - w) * tmp1;
            tmp2 = 2.0 * (tmp2 - tmp1);
            if tmp2 > 0.0 {
                p = -p;
            }
            tmp2 = tmp2.abs();
            let dx_temp = deltax;
            deltax = rat;
            if p > tmp2 * (a - x) && p < tmp2 * (b - x) && p.abs() < (0.5 * tmp2 * dx_temp).abs()
            {
                rat = p / tmp2;
                let u = x + rat;
                if (u - a) < tol2 || (b - u) < tol2 {
                    rat = if xmid - x >= 0.0 { tol1 } else { -tol1 };
                }
            } else {
                deltax = if x >= xmid { a - x } else { b - x };
                rat = CGOLD * deltax;
            }
        }

        let u = if rat.abs() < tol1 {
            if rat >= 0.0 {
                x + tol1
            } else {
                x - tol1
            }
        } else {
            x + rat
        };
        let fu = f(u);

        if fu > fx {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                w = u;
                fv = fw;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        } else {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            w = x;
            x = u;
            fv = fw;
            fw = fx;
            fx = fu;
        }
    }

    x
}
